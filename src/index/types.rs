use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a node in the builder arena
pub type NodeId = u32;

/// Separates node records in the packed string
pub const NODE_SEP: char = ';';

/// Separates a terminal string from the entry that follows it
pub const STRING_SEP: char = ',';

/// Leading marker of a terminal node record
pub const TERMINAL_PREFIX: char = '!';

/// Separates the symbol id from the record index in a symbol table record
pub const SYMBOL_SEP: char = ':';

/// Sorts after every word over `a-z`; the exclusive upper bound of a full
/// enumeration.
pub const MAX_WORD: &str = "{";

/// Outgoing entry of a builder node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    /// The label ends a word
    Terminal,
    /// The label leads to another node
    Child(NodeId),
}

impl Entry {
    #[inline]
    pub fn child(&self) -> Option<NodeId> {
        match *self {
            Entry::Child(id) => Some(id),
            Entry::Terminal => None,
        }
    }
}

/// Builder-time trie node
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    /// The prefix ending at this node is itself a word
    pub terminal: bool,
    /// Outgoing labels in lexicographic order
    pub entries: BTreeMap<String, Entry>,
    /// A compaction signature has been assigned; the node must not change
    pub frozen: bool,
}

impl TrieNode {
    /// Entry whose label starts with `first`, if any
    pub fn entry_starting_with(&self, first: u8) -> Option<(&str, Entry)> {
        self.entries
            .iter()
            .find(|(label, _)| label.as_bytes().first() == Some(&first))
            .map(|(label, entry)| (label.as_str(), *entry))
    }

    /// Child node ids in label order
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.values().filter_map(Entry::child)
    }

    /// Structural identity used to merge equivalent nodes
    pub fn signature(&self) -> NodeSignature {
        NodeSignature {
            terminal: self.terminal,
            entries: self
                .entries
                .iter()
                .map(|(label, entry)| (label.clone(), *entry))
                .collect(),
        }
    }
}

/// Terminal flag plus the ordered `(label, entry)` list of a node.
///
/// Two nodes with equal signatures (children already canonical) accept the
/// same set of suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeSignature {
    pub terminal: bool,
    pub entries: Vec<(String, Entry)>,
}

/// Configuration for the packer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Minimum in-degree before a node is considered for the symbol table
    #[serde(default = "default_symbol_min_refs")]
    pub symbol_min_refs: u32,

    /// Maximum number of symbol table entries (0 disables the symbol table)
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,
}

fn default_symbol_min_refs() -> u32 {
    3
}

fn default_max_symbols() -> usize {
    // Keeps every symbol id a single character
    36
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            symbol_min_refs: default_symbol_min_refs(),
            max_symbols: default_max_symbols(),
        }
    }
}

impl PackConfig {
    /// Packer configuration that only emits relative references
    pub fn relative_only() -> Self {
        Self {
            max_symbols: 0,
            ..Self::default()
        }
    }
}
