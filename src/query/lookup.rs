use crate::index::reader::PackedTrie;

impl PackedTrie {
    /// True if `word` is in the dictionary
    pub fn is_word(&self, word: &str) -> bool {
        let mut inode = 0;
        let mut rest = word;

        loop {
            let Some(&first) = rest.as_bytes().first() else {
                return self.is_terminal(inode);
            };
            let Some(entry) = self.entry_starting_with(inode, first) else {
                return false;
            };

            let Some(code) = entry.code else {
                return entry.label == rest;
            };
            let Some(tail) = rest.strip_prefix(entry.label) else {
                return false;
            };
            let Some(next) = self.inode_from_ref(code, inode) else {
                return false;
            };
            rest = tail;
            inode = next;
        }
    }

    /// Longest dictionary word that is a prefix of `word`, or `""`
    pub fn longest_match<'w>(&self, word: &'w str) -> &'w str {
        let len = self.prefix_word_lengths(word).last().copied().unwrap_or(0);
        &word[..len]
    }

    /// Every dictionary word that is a prefix of `word`, shortest first
    pub fn matches<'w>(&self, word: &'w str) -> Vec<&'w str> {
        self.prefix_word_lengths(word)
            .into_iter()
            .map(|len| &word[..len])
            .collect()
    }

    /// Byte lengths of the non-empty prefixes of `word` that are words
    fn prefix_word_lengths(&self, word: &str) -> Vec<usize> {
        let mut lengths = Vec::new();
        let mut inode = 0;
        let mut consumed = 0;

        loop {
            if consumed > 0 && self.is_terminal(inode) {
                lengths.push(consumed);
            }

            let rest = &word[consumed..];
            let Some(&first) = rest.as_bytes().first() else {
                break;
            };
            let Some(entry) = self.entry_starting_with(inode, first) else {
                break;
            };
            if !rest.starts_with(entry.label) {
                break;
            }

            match entry.code {
                None => {
                    lengths.push(consumed + entry.label.len());
                    break;
                }
                Some(code) => {
                    let Some(next) = self.inode_from_ref(code, inode) else {
                        break;
                    };
                    consumed += entry.label.len();
                    inode = next;
                }
            }
        }

        lengths
    }
}
