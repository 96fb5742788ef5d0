use crate::index::reader::PackedTrie;
use crate::index::trie::Trie;
use crate::index::types::{PackConfig, NODE_SEP, SYMBOL_SEP};
use crate::utils::extract_words;
use crate::utils::progress::{bar, spinner};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Progress updates during insertion are batched
const INSERT_BATCH: usize = 4096;

/// Summary of one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Distinct normalized words
    pub words: usize,
    /// Nodes after compaction
    pub nodes: usize,
    /// Symbol table entries in the output
    pub symbols: usize,
    /// Size of the packed string
    pub bytes: usize,
    pub elapsed: Duration,
}

/// Build a packed dictionary from raw text
pub fn pack_text(text: &str, config: &PackConfig) -> (String, BuildReport) {
    pack_text_with_progress(text, config, true)
}

fn pack_text_with_progress(text: &str, config: &PackConfig, silent: bool) -> (String, BuildReport) {
    let start = Instant::now();

    // Phase 1: normalize
    let words = extract_words(text);
    debug!(words = words.len(), "normalized word source");

    // Phase 2: insert, merging closed branches as we go
    let progress = bar(words.len() as u64, "Inserting words...", silent);
    let mut trie = Trie::new();
    for batch in words.chunks(INSERT_BATCH) {
        for word in batch {
            trie.insert(word);
        }
        if let Some(ref pb) = progress {
            pb.inc(batch.len() as u64);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message(format!("Inserted {} words", trie.word_count()));
    }
    debug!(words = trie.word_count(), "inserted words");

    // Phase 3: compact
    let optimize_spinner = spinner("Optimizing...", silent);
    trie.optimize();
    let nodes = trie.node_count();
    if let Some(spinner) = optimize_spinner {
        spinner.finish_with_message(format!("Optimized to {} nodes", nodes));
    }

    // Phase 4: serialize
    let pack_spinner = spinner("Packing...", silent);
    let packed = trie.pack_with_config(config);
    let symbols = packed
        .split(NODE_SEP)
        .take_while(|record| record.contains(SYMBOL_SEP))
        .count();
    if let Some(spinner) = pack_spinner {
        spinner.finish_with_message(format!("Packed {} bytes", packed.len()));
    }

    let report = BuildReport {
        words: trie.word_count(),
        nodes,
        symbols,
        bytes: packed.len(),
        elapsed: start.elapsed(),
    };
    (packed, report)
}

/// Build a packed dictionary file from a word source file
pub fn build_pack_file(
    input: &Path,
    output: &Path,
    config: &PackConfig,
    silent: bool,
) -> Result<BuildReport> {
    if !silent {
        println!("Packing: {}", input.display());
    }

    let read_spinner = spinner("Reading word source...", silent);
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read word source {}", input.display()))?;
    if let Some(spinner) = read_spinner {
        spinner.finish_with_message(format!("Read {} bytes", text.len()));
    }

    let (packed, report) = pack_text_with_progress(&text, config, silent);

    // Catch packer bugs before anything is written
    PackedTrie::new(&packed).context("Packed output failed validation")?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, format!("{}\n", packed))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        words = report.words,
        nodes = report.nodes,
        symbols = report.symbols,
        bytes = report.bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        output = %output.display(),
        "built packed dictionary"
    );

    if !silent {
        println!(
            "{} words -> {} nodes, {} bytes ({} symbols) in {:.2?}",
            report.words, report.nodes, report.bytes, report.symbols, report.elapsed
        );
        println!("Packed dictionary stored at: {}", output.display());
    }

    Ok(report)
}
