//! Deterministic word lists for integration tests and benchmarks

/// Every syllable starts with a different letter
pub const SYLLABLES: [&str; 20] = [
    "ba", "ce", "di", "fo", "gu", "ha", "je", "ki", "lo", "mu", "na", "pe", "qui", "ro", "su",
    "ta", "ve", "wi", "xo", "yu",
];

pub const SUFFIXES: [&str; 6] = ["", "s", "ed", "ing", "er", "ers"];

/// Small linear congruential generator so the word list is stable
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Three-syllable stems, each with a pseudo-random non-empty suffix set.
/// Returns the words in ascending order without duplicates.
pub fn generated_words() -> Vec<String> {
    let mut rng = Lcg::new(0x5eed);
    let mut words = Vec::new();

    for a in SYLLABLES {
        for b in SYLLABLES {
            for c in SYLLABLES {
                let mask = rng.next() % 63 + 1;
                for (bit, suffix) in SUFFIXES.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        words.push(format!("{}{}{}{}", a, b, c, suffix));
                    }
                }
            }
        }
    }

    words.sort();
    words.dedup();
    words
}
