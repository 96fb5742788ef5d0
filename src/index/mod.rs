pub mod build;
pub mod compact;
pub mod reader;
pub mod stats;
pub mod trie;
pub mod types;
pub mod writer;

pub use build::{build_pack_file, pack_text, BuildReport};
pub use reader::{PackError, PackedTrie, RecordEntries, RecordEntry};
pub use stats::PackStats;
pub use trie::Trie;
pub use types::*;
pub use writer::PackWriter;
