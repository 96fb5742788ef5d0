#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packtrie::index::{PackConfig, PackedTrie, Trie};

#[derive(Arbitrary, Debug)]
struct Input {
    words: Vec<String>,
    symbol_min_refs: u8,
    max_symbols: u8,
}

fuzz_target!(|input: Input| {
    let config = PackConfig {
        symbol_min_refs: input.symbol_min_refs as u32,
        max_symbols: input.max_symbols as usize,
    };

    let mut trie = Trie::from_words(&input.words);
    let packed = trie.pack_with_config(&config);
    let dict = PackedTrie::new(&packed).expect("packed output must parse");

    let mut expected: Vec<String> = input
        .words
        .iter()
        .map(|w| packtrie::utils::normalize_word(w))
        .filter(|w| !w.is_empty())
        .collect();
    expected.sort();
    expected.dedup();

    for word in &expected {
        assert!(dict.is_word(word), "{} should be found", word);
    }
    assert_eq!(dict.words("", None, None), expected);
});
