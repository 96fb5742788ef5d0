#![no_main]

use libfuzzer_sys::fuzz_target;
use packtrie::index::PackedTrie;

fuzz_target!(|data: &str| {
    // Arbitrary text must either be rejected or yield a dictionary whose
    // queries terminate without panicking
    if let Ok(dict) = PackedTrie::new(data) {
        let words = dict.words("", None, Some(1_000));
        for word in &words {
            assert!(dict.is_word(word));
            let _ = dict.matches(word);
        }
        assert!(words.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(PackedTrie::new(&dict.to_string()).as_ref(), Ok(&dict));
    }
});
