//! # packtrie - packed DAWG word dictionaries
//!
//! packtrie turns a word list into a compact, immutable text encoding of a
//! minimal word graph, and answers membership, prefix and range queries by
//! scanning that text directly.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Trie builder, suffix compaction, packer and packed reader
//! - [`query`] - Lookups and ordered enumeration over a packed dictionary
//! - [`output`] - Terminal formatting for the CLI
//! - [`utils`] - Reference codes, word normalization, config, progress
//!
//! ## Quick Start
//!
//! ```
//! use packtrie::index::{PackedTrie, Trie};
//!
//! let mut trie = Trie::from_text("bat bats cat cats dog dogs fish fishing dogging");
//! let packed = trie.pack();
//! assert_eq!(packed, "bat3cat3dog2fish1;!ing;!ging,s;!s");
//!
//! let dict = PackedTrie::new(&packed).unwrap();
//! assert!(dict.is_word("dogging"));
//! assert_eq!(dict.longest_match("fishingrod"), "fishing");
//! assert_eq!(dict.words("dog", None, None), vec!["dog", "dogging", "dogs"]);
//! ```
//!
//! ## Format
//!
//! One `;`-separated record per node, root first. A record starts with `!`
//! when the node ends a word, followed by its labels in order; a label is
//! followed by a base-36 reference to its child record, or by `,` when it ends
//! a word and more labels follow. Heavily shared nodes may be listed up front
//! in a symbol table of `id:record` pairs.

pub mod index;
pub mod output;
pub mod query;
pub mod utils;
