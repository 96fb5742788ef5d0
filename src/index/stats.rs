use crate::index::reader::PackedTrie;
use crate::index::types::MAX_WORD;
use crate::utils::from_alpha_code;
use anyhow::Result;
use serde::Serialize;
use std::ops::ControlFlow;
use std::path::Path;

/// Size breakdown of a packed dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackStats {
    pub words: usize,
    pub records: usize,
    pub terminal_records: usize,
    pub symbols: usize,
    /// Labels across all records
    pub entries: usize,
    /// Entries that reference another record
    pub references: usize,
    /// References resolved through the symbol table
    pub symbol_references: usize,
    pub label_bytes: usize,
    pub bytes: usize,
}

impl PackStats {
    /// Gather statistics by scanning every record
    pub fn collect(trie: &PackedTrie) -> Self {
        let mut stats = PackStats {
            words: 0,
            records: trie.node_count(),
            terminal_records: 0,
            symbols: trie.symbol_count(),
            entries: 0,
            references: 0,
            symbol_references: 0,
            label_bytes: 0,
            bytes: trie.to_string().len(),
        };

        for inode in 0..trie.node_count() {
            if trie.is_terminal(inode) {
                stats.terminal_records += 1;
            }
            for entry in trie.entries(inode) {
                stats.entries += 1;
                stats.label_bytes += entry.label.len();
                if let Some(code) = entry.code {
                    stats.references += 1;
                    let by_symbol = from_alpha_code(code)
                        .is_some_and(|value| value < trie.symbol_count() as u64);
                    if by_symbol {
                        stats.symbol_references += 1;
                    }
                }
            }
        }

        let _ = trie.enumerate("", MAX_WORD, |_| {
            stats.words += 1;
            ControlFlow::Continue(())
        });

        stats
    }
}

/// Display pack statistics
pub fn show_stats(path: &Path, json: bool) -> Result<()> {
    let trie = PackedTrie::open(path)?;
    let stats = PackStats::collect(&trie);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Pack Statistics");
    println!("===============");
    println!();
    println!("File:              {}", path.display());
    println!("Words:             {}", stats.words);
    println!("Records:           {}", stats.records);
    println!("Terminal records:  {}", stats.terminal_records);
    println!("Symbols:           {}", stats.symbols);
    println!();
    println!("Entries:           {}", stats.entries);
    println!(
        "References:        {} ({} via symbols)",
        stats.references, stats.symbol_references
    );
    println!("Label bytes:       {}", stats.label_bytes);
    println!("Packed size:       {}", format_size(stats.bytes as u64));
    if stats.words > 0 {
        println!(
            "Bytes per word:    {:.2}",
            stats.bytes as f64 / stats.words as f64
        );
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
