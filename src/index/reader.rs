use crate::index::types::{NODE_SEP, STRING_SEP, SYMBOL_SEP, TERMINAL_PREFIX};
use crate::utils::{from_alpha_code, is_code_byte, to_alpha_code};
use anyhow::{Context, Result};
use memchr::memchr_iter;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a packed string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("malformed symbol table record {record}: {text:?}")]
    MalformedSymbol { record: usize, text: String },

    #[error("symbol id {id} out of range (symbol table has {count} entries)")]
    SymbolOutOfRange { id: u64, count: usize },

    #[error("symbol id {id} is defined more than once")]
    DuplicateSymbol { id: u64 },

    #[error("packed string has a symbol table but no node records")]
    NoRecords,

    #[error("symbol id {id} targets record {target}, outside (0, {count})")]
    SymbolTargetOutOfRange { id: usize, target: usize, count: usize },

    #[error("root record is marked as a word; the empty string is never a word")]
    TerminalRoot,

    #[error("unexpected {found:?} in record {record} at offset {offset}")]
    UnexpectedChar {
        record: usize,
        offset: usize,
        found: char,
    },

    #[error("record {record} ends with a separator")]
    TrailingSeparator { record: usize },

    #[error("entries of record {record} are not in order")]
    UnsortedEntries { record: usize },

    #[error("invalid reference code {code:?} in record {record}")]
    InvalidCode { record: usize, code: String },

    #[error("record {record} references record {target}, outside ({record}, {count})")]
    BadReference {
        record: usize,
        target: u64,
        count: usize,
    },
}

/// Read-only dictionary over packed text.
///
/// Only the record strings and the symbol table are kept; queries scan the
/// records directly. Every reference is validated on construction to point
/// to a later record, so walks always terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTrie {
    /// Node records, root first
    nodes: Vec<String>,
    /// Target record per symbol id
    syms: Vec<usize>,
}

/// One `label[code]` entry of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordEntry<'a> {
    pub label: &'a str,
    /// Reference to the child record; `None` when the label ends a word
    pub code: Option<&'a str>,
}

/// Iterator over the entries of one record.
///
/// Stops at the first byte that does not fit the record grammar; records of
/// a constructed [`PackedTrie`] are already validated.
#[derive(Debug, Clone)]
pub struct RecordEntries<'a> {
    rest: &'a str,
}

impl<'a> RecordEntries<'a> {
    /// Entries of `record`, skipping the terminal marker
    pub fn new(record: &'a str) -> Self {
        let rest = record
            .strip_prefix(TERMINAL_PREFIX)
            .unwrap_or(record);
        Self { rest }
    }
}

impl<'a> Iterator for RecordEntries<'a> {
    type Item = RecordEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.rest.as_bytes();
        let label_end = bytes
            .iter()
            .position(|b| !b.is_ascii_lowercase())
            .unwrap_or(bytes.len());
        if label_end == 0 {
            self.rest = "";
            return None;
        }

        let code_end = bytes[label_end..]
            .iter()
            .position(|&b| !is_code_byte(b))
            .map_or(bytes.len(), |n| label_end + n);

        let label = &self.rest[..label_end];
        let code = (code_end > label_end).then(|| &self.rest[label_end..code_end]);

        let mut next = code_end;
        if bytes.get(next) == Some(&(STRING_SEP as u8)) {
            next += 1;
        }
        self.rest = &self.rest[next..];

        Some(RecordEntry { label, code })
    }
}

fn symbol_regex() -> &'static Regex {
    static SYMBOL: OnceLock<Regex> = OnceLock::new();
    SYMBOL.get_or_init(|| {
        Regex::new(r"^([0-9A-Z]+):([0-9A-Z]+)$").unwrap_or_else(|e| panic!("symbol pattern: {}", e))
    })
}

impl PackedTrie {
    /// Parse and validate a packed string
    pub fn new(packed: &str) -> Result<Self, PackError> {
        let mut records = Vec::new();
        let mut start = 0;
        for sep in memchr_iter(NODE_SEP as u8, packed.as_bytes()) {
            records.push(&packed[start..sep]);
            start = sep + 1;
        }
        records.push(&packed[start..]);

        let header_len = records
            .iter()
            .take_while(|record| record.contains(SYMBOL_SEP))
            .count();
        let syms = parse_symbols(&records[..header_len])?;

        let nodes: Vec<String> = records[header_len..]
            .iter()
            .map(|record| record.to_string())
            .collect();
        if nodes.is_empty() {
            return Err(PackError::NoRecords);
        }
        if nodes[0].starts_with(TERMINAL_PREFIX) {
            return Err(PackError::TerminalRoot);
        }
        // The root is never a reference target
        if let Some((id, &target)) = syms
            .iter()
            .enumerate()
            .find(|&(_, &target)| target == 0 || target >= nodes.len())
        {
            return Err(PackError::SymbolTargetOutOfRange {
                id,
                target,
                count: nodes.len(),
            });
        }

        let trie = Self { nodes, syms };
        for index in 0..trie.nodes.len() {
            trie.validate_record(index)?;
        }
        Ok(trie)
    }

    /// Load a packed file
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read packed file {}", path.display()))?;
        let packed = text.trim_end_matches(['\n', '\r']);
        Self::new(packed).with_context(|| format!("Invalid packed file {}", path.display()))
    }

    /// Number of node records
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of symbol table entries
    pub fn symbol_count(&self) -> usize {
        self.syms.len()
    }

    /// Raw text of record `inode`
    pub fn record(&self, inode: usize) -> Option<&str> {
        self.nodes.get(inode).map(String::as_str)
    }

    /// Target record of each symbol id
    pub fn symbols(&self) -> &[usize] {
        &self.syms
    }

    /// True if the prefix leading to record `inode` is a word; false for
    /// an unknown record
    pub fn is_terminal(&self, inode: usize) -> bool {
        self.record(inode)
            .is_some_and(|record| record.starts_with(TERMINAL_PREFIX))
    }

    /// Entries of record `inode`; empty for an unknown record
    pub fn entries(&self, inode: usize) -> RecordEntries<'_> {
        RecordEntries::new(self.record(inode).unwrap_or(""))
    }

    /// Entry of record `inode` whose label starts with `first`
    pub fn entry_starting_with(&self, inode: usize, first: u8) -> Option<RecordEntry<'_>> {
        self.entries(inode)
            .map(|entry| (entry.label.as_bytes()[0], entry))
            .take_while(|&(b, _)| b <= first)
            .find(|&(b, _)| b == first)
            .map(|(_, entry)| entry)
    }

    /// Resolve a reference code found in record `inode` to a record index.
    ///
    /// Values below the symbol count are symbol ids; anything else is an
    /// offset from `inode`, shifted by the symbol count.
    pub fn inode_from_ref(&self, code: &str, inode: usize) -> Option<usize> {
        let value = from_alpha_code(code)?;
        self.resolve(value, inode)
    }

    fn resolve(&self, value: u64, inode: usize) -> Option<usize> {
        let sym_count = self.syms.len() as u64;
        if value < sym_count {
            return Some(self.syms[value as usize]);
        }
        let offset = usize::try_from(value - sym_count).ok()?;
        inode.checked_add(offset)
    }

    fn validate_record(&self, index: usize) -> Result<(), PackError> {
        let record = self.nodes[index].as_str();
        let bytes = record.as_bytes();
        let count = self.nodes.len();

        let unexpected = |offset: usize| PackError::UnexpectedChar {
            record: index,
            offset,
            found: record[offset..].chars().next().unwrap_or('\0'),
        };

        let mut pos = usize::from(bytes.first() == Some(&(TERMINAL_PREFIX as u8)));
        let mut prev_first: Option<u8> = None;

        while pos < bytes.len() {
            // Label
            let label_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_lowercase() {
                pos += 1;
            }
            if pos == label_start {
                return Err(unexpected(pos));
            }
            let first = bytes[label_start];
            if prev_first.is_some_and(|prev| prev >= first) {
                return Err(PackError::UnsortedEntries { record: index });
            }
            prev_first = Some(first);

            // Optional reference
            let code_start = pos;
            while pos < bytes.len() && is_code_byte(bytes[pos]) {
                pos += 1;
            }
            let has_code = pos > code_start;
            if has_code {
                let code = &record[code_start..pos];
                let value = from_alpha_code(code).ok_or_else(|| PackError::InvalidCode {
                    record: index,
                    code: code.to_string(),
                })?;
                match self.resolve(value, index) {
                    Some(target) if target > index && target < count => {}
                    target => {
                        return Err(PackError::BadReference {
                            record: index,
                            target: target.map_or(u64::MAX, |t| t as u64),
                            count,
                        });
                    }
                }
            }

            if pos == bytes.len() {
                break;
            }
            if bytes[pos] == STRING_SEP as u8 {
                pos += 1;
                if pos == bytes.len() {
                    return Err(PackError::TrailingSeparator { record: index });
                }
            } else if !has_code {
                return Err(unexpected(pos));
            }
        }

        Ok(())
    }
}

/// Parse the leading `id:record` records into a table indexed by symbol id
fn parse_symbols(header: &[&str]) -> Result<Vec<usize>, PackError> {
    let mut syms = vec![None; header.len()];

    for (record, text) in header.iter().enumerate() {
        let malformed = || PackError::MalformedSymbol {
            record,
            text: text.to_string(),
        };
        let caps = symbol_regex().captures(text).ok_or_else(malformed)?;
        let id = from_alpha_code(&caps[1]).ok_or_else(malformed)?;
        let target = from_alpha_code(&caps[2]).ok_or_else(malformed)?;

        let slot = usize::try_from(id)
            .ok()
            .and_then(|i| syms.get_mut(i))
            .ok_or(PackError::SymbolOutOfRange {
                id,
                count: header.len(),
            })?;
        if slot.is_some() {
            return Err(PackError::DuplicateSymbol { id });
        }
        *slot = Some(usize::try_from(target).unwrap_or(usize::MAX));
    }

    // Ids are unique and below the header length, so every slot is filled
    Ok(syms.into_iter().flatten().collect())
}

impl FromStr for PackedTrie {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for PackedTrie {
    /// Canonical packed text: symbols in id order, then the records
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, &target) in self.syms.iter().enumerate() {
            write!(
                f,
                "{}{}{}{}",
                to_alpha_code(id as u64),
                SYMBOL_SEP,
                to_alpha_code(target as u64),
                NODE_SEP
            )?;
        }
        for (index, record) in self.nodes.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", NODE_SEP)?;
            }
            f.write_str(record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let trie = PackedTrie::new("aa1;h1l;!ed,ing,s").unwrap();
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.symbol_count(), 0);
        assert_eq!(trie.record(1), Some("h1l"));
        assert_eq!(trie.record(3), None);
        assert!(trie.is_terminal(2));
        assert!(!trie.is_terminal(0));
    }

    #[test]
    fn test_record_entries() {
        let entries: Vec<_> = RecordEntries::new("!ed,ing2s").collect();
        assert_eq!(
            entries,
            vec![
                RecordEntry { label: "ed", code: None },
                RecordEntry { label: "ing", code: Some("2") },
                RecordEntry { label: "s", code: None },
            ]
        );
        assert_eq!(RecordEntries::new("!").count(), 0);
        assert_eq!(RecordEntries::new("").count(), 0);
        // Stops at garbage instead of failing
        assert_eq!(RecordEntries::new("ab;cd").count(), 1);
    }

    #[test]
    fn test_entry_starting_with() {
        let trie = PackedTrie::new("a,is,t1;est,his").unwrap();
        assert_eq!(trie.entry_starting_with(0, b't').map(|e| e.label), Some("t"));
        assert_eq!(trie.entry_starting_with(0, b'b'), None);
        assert_eq!(trie.entry_starting_with(1, b'h').map(|e| e.code), Some(None));
    }

    #[test]
    fn test_inode_from_ref() {
        let relative = PackedTrie::new("aa1;h1l;!ed,ing,s").unwrap();
        assert_eq!(relative.inode_from_ref("1", 0), Some(1));
        assert_eq!(relative.inode_from_ref("2", 1), Some(3));
        assert_eq!(relative.inode_from_ref("x", 1), None);

        // Symbol 0 is record 2; relative codes are shifted by one
        let symbols = PackedTrie::new("0:2;a0b2;c0;!").unwrap();
        assert_eq!(symbols.symbol_count(), 1);
        assert_eq!(symbols.inode_from_ref("0", 0), Some(2));
        assert_eq!(symbols.inode_from_ref("2", 0), Some(1));
        assert_eq!(symbols.inode_from_ref("0", 1), Some(2));
    }

    #[test]
    fn test_empty_pack() {
        let trie = PackedTrie::new("").unwrap();
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.record(0), Some(""));
        assert_eq!(trie.to_string(), "");
    }

    #[test]
    fn test_display_is_canonical() {
        let text = "bat3cat3dog2fish1;!ing;!ging,s;!s";
        let trie: PackedTrie = text.parse().unwrap();
        assert_eq!(trie.to_string(), text);

        let reordered = PackedTrie::new("1:3;0:2;a0b1;c0;!;!").unwrap();
        assert_eq!(reordered.to_string(), "0:2;1:3;a0b1;c0;!;!");
    }

    #[test]
    fn test_symbol_errors() {
        assert!(matches!(
            PackedTrie::new("0:1:2;a"),
            Err(PackError::MalformedSymbol { record: 0, .. })
        ));
        assert!(matches!(
            PackedTrie::new("0:a;b"),
            Err(PackError::MalformedSymbol { .. })
        ));
        assert_eq!(
            PackedTrie::new("1:1;a"),
            Err(PackError::SymbolOutOfRange { id: 1, count: 1 })
        );
        assert_eq!(
            PackedTrie::new("0:1;0:2;a;b;c"),
            Err(PackError::DuplicateSymbol { id: 0 })
        );
        assert_eq!(PackedTrie::new("0:1"), Err(PackError::NoRecords));
        assert_eq!(
            PackedTrie::new("0:Z;a"),
            Err(PackError::SymbolTargetOutOfRange {
                id: 0,
                target: 35,
                count: 1
            })
        );
        assert_eq!(
            PackedTrie::new("0:0;a;!"),
            Err(PackError::SymbolTargetOutOfRange {
                id: 0,
                target: 0,
                count: 2
            })
        );
        assert_eq!(
            PackedTrie::new("0:1;1:2;a0b1;!"),
            Err(PackError::SymbolTargetOutOfRange {
                id: 1,
                target: 2,
                count: 2
            })
        );
    }

    #[test]
    fn test_terminal_root_rejected() {
        assert_eq!(PackedTrie::new("!a"), Err(PackError::TerminalRoot));
        assert_eq!(PackedTrie::new("!"), Err(PackError::TerminalRoot));
        assert!(PackedTrie::new("a;!").is_ok());
    }

    #[test]
    fn test_accessors_out_of_range() {
        let trie = PackedTrie::new("bat3cat3dog2fish1;!ing;!ging,s;!s").unwrap();
        assert!(trie.is_terminal(1));
        assert!(!trie.is_terminal(4));
        assert!(!trie.is_terminal(usize::MAX));
        assert_eq!(trie.entries(4).count(), 0);
        assert_eq!(trie.entry_starting_with(99, b'b'), None);
        assert_eq!(trie.record(4), None);
    }

    #[test]
    fn test_record_errors() {
        assert_eq!(
            PackedTrie::new("a!b"),
            Err(PackError::UnexpectedChar {
                record: 0,
                offset: 1,
                found: '!'
            })
        );
        assert_eq!(
            PackedTrie::new("a;x:y"),
            Err(PackError::UnexpectedChar {
                record: 1,
                offset: 1,
                found: ':'
            })
        );
        assert_eq!(
            PackedTrie::new("a,b,"),
            Err(PackError::TrailingSeparator { record: 0 })
        );
        assert_eq!(
            PackedTrie::new("b,a"),
            Err(PackError::UnsortedEntries { record: 0 })
        );
        assert_eq!(
            PackedTrie::new("ab,ac"),
            Err(PackError::UnsortedEntries { record: 0 })
        );
        assert!(matches!(
            PackedTrie::new(&format!("a{}", "Z".repeat(40))),
            Err(PackError::InvalidCode { record: 0, .. })
        ));
    }

    #[test]
    fn test_bad_references() {
        // Past the end
        assert_eq!(
            PackedTrie::new("a2;!"),
            Err(PackError::BadReference {
                record: 0,
                target: 2,
                count: 2
            })
        );
        // Offset 0 would be a self loop
        assert_eq!(
            PackedTrie::new("a0;!"),
            Err(PackError::BadReference {
                record: 0,
                target: 0,
                count: 2
            })
        );
        // A symbol pointing backwards would allow cycles
        assert_eq!(
            PackedTrie::new("0:1;a2;b2;c0"),
            Err(PackError::BadReference {
                record: 2,
                target: 1,
                count: 3
            })
        );
    }

    #[test]
    fn test_packed_trie_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PackedTrie>();
    }
}
