//! Queries over a [`PackedTrie`](crate::index::PackedTrie).
//!
//! Lookups walk a single path from the root record; enumeration walks the
//! records depth-first with an explicit stack, in ascending word order.

pub mod enumerate;
pub mod lookup;

pub use enumerate::beyond;
