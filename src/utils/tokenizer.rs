use rayon::prelude::*;

/// Word lists above this size are sorted in parallel
const PARALLEL_SORT_THRESHOLD: usize = 64 * 1024;

/// Extract the normalized word set from raw text.
///
/// The text is split on every run of characters that are not ASCII letters,
/// each token is lower-cased, and the result is sorted and deduplicated so it
/// can be fed straight into [`Trie::insert`](crate::index::Trie::insert).
pub fn extract_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect();

    sort_unique(&mut words);
    words
}

/// Normalize a single word: strip everything that is not an ASCII letter and
/// lower-case the rest.
pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// True if `word` is already in normalized form
#[inline]
pub fn is_normalized(word: &str) -> bool {
    word.bytes().all(|b| b.is_ascii_lowercase())
}

/// Sort and deduplicate a word list in place
pub fn sort_unique(words: &mut Vec<String>) {
    if words.len() >= PARALLEL_SORT_THRESHOLD {
        words.par_sort_unstable();
    } else {
        words.sort_unstable();
    }
    words.dedup();
}
