use crate::index::trie::Trie;
use crate::index::types::{
    Entry, NodeId, PackConfig, NODE_SEP, STRING_SEP, SYMBOL_SEP, TERMINAL_PREFIX,
};
use crate::utils::{alpha_code_len, to_alpha_code};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Serializes a trie into packed text.
///
/// Nodes are numbered in post-order and written in reverse, so the root is
/// record 0 and every reference points to a later record. References are
/// written relative to the referencing record unless the target made it into
/// the symbol table.
pub struct PackWriter<'a> {
    trie: &'a Trie,
    config: &'a PackConfig,
}

/// Record numbering of the reachable nodes
struct Layout {
    /// Node ids in record order (root first)
    nodes: Vec<NodeId>,
    /// Record index per node id
    record_of: Vec<usize>,
    /// (source record, target record) for every child edge
    edges: Vec<(usize, usize)>,
}

/// Symbol id per target record
type SymbolIds = FxHashMap<usize, usize>;

impl<'a> PackWriter<'a> {
    /// Create a writer over `trie`; the trie should already be optimized
    pub fn new(trie: &'a Trie, config: &'a PackConfig) -> Self {
        Self { trie, config }
    }

    /// Produce the packed string
    pub fn write(&self) -> String {
        let layout = self.layout();
        let symbols = self.choose_symbols(&layout);
        let symbol_ids: SymbolIds = symbols
            .iter()
            .enumerate()
            .map(|(id, &record)| (record, id))
            .collect();

        let mut out = String::new();

        // Symbol table header, one record per symbol
        for (id, &record) in symbols.iter().enumerate() {
            out.push_str(&to_alpha_code(id as u64));
            out.push(SYMBOL_SEP);
            out.push_str(&to_alpha_code(record as u64));
            out.push(NODE_SEP);
        }

        for (record, &id) in layout.nodes.iter().enumerate() {
            if record > 0 {
                out.push(NODE_SEP);
            }
            self.write_record(&mut out, record, id, &layout, &symbol_ids);
        }

        debug!(
            records = layout.nodes.len(),
            symbols = symbols.len(),
            references = layout.edges.len(),
            bytes = out.len(),
            "packed trie"
        );

        out
    }

    fn layout(&self) -> Layout {
        let mut nodes = self.trie.post_order_from(self.trie.root, |_| false);
        nodes.reverse();

        let mut record_of = vec![usize::MAX; self.trie.nodes.len()];
        for (record, &id) in nodes.iter().enumerate() {
            record_of[id as usize] = record;
        }

        let mut edges = Vec::new();
        for (record, &id) in nodes.iter().enumerate() {
            for child in self.trie.node(id).children() {
                edges.push((record, record_of[child as usize]));
            }
        }

        Layout {
            nodes,
            record_of,
            edges,
        }
    }

    /// Pick the symbol table: a prefix of the most referenced records that
    /// minimizes the total serialized size. Returns target records by symbol id.
    fn choose_symbols(&self, layout: &Layout) -> Vec<usize> {
        if self.config.max_symbols == 0 {
            return Vec::new();
        }

        let mut degree = vec![0u32; layout.nodes.len()];
        for &(_, target) in &layout.edges {
            degree[target] += 1;
        }

        let mut candidates: Vec<usize> = (0..layout.nodes.len())
            .filter(|&record| degree[record] >= self.config.symbol_min_refs.max(1))
            .collect();
        candidates.sort_by(|&a, &b| degree[b].cmp(&degree[a]).then(a.cmp(&b)));
        candidates.truncate(self.config.max_symbols);

        let mut best_cost = reference_cost(layout, &[]);
        let mut best_len = 0;
        for k in 1..=candidates.len() {
            let cost = reference_cost(layout, &candidates[..k]);
            if cost < best_cost {
                best_cost = cost;
                best_len = k;
            }
        }

        debug!(
            candidates = candidates.len(),
            symbols = best_len,
            bytes = best_cost,
            "chose symbol table"
        );

        candidates.truncate(best_len);
        candidates
    }

    fn write_record(
        &self,
        out: &mut String,
        record: usize,
        id: NodeId,
        layout: &Layout,
        symbol_ids: &SymbolIds,
    ) {
        let node = self.trie.node(id);
        if node.terminal {
            out.push(TERMINAL_PREFIX);
        }

        // A bare terminal label must be separated from whatever follows it
        let mut pending_sep = false;
        for (label, entry) in &node.entries {
            if pending_sep {
                out.push(STRING_SEP);
            }
            out.push_str(label);
            match *entry {
                Entry::Terminal => pending_sep = true,
                Entry::Child(child) => {
                    let target = layout.record_of[child as usize];
                    out.push_str(&to_alpha_code(reference_value(record, target, symbol_ids)));
                    pending_sep = false;
                }
            }
        }
    }
}

/// Code value of a reference from `source` to `target`
fn reference_value(source: usize, target: usize, symbol_ids: &SymbolIds) -> u64 {
    match symbol_ids.get(&target) {
        Some(&id) => id as u64,
        None => (target - source + symbol_ids.len()) as u64,
    }
}

/// Bytes spent on the symbol header plus every reference code when `symbols`
/// (target records by symbol id) form the symbol table
fn reference_cost(layout: &Layout, symbols: &[usize]) -> usize {
    let symbol_ids: SymbolIds = symbols
        .iter()
        .enumerate()
        .map(|(id, &record)| (record, id))
        .collect();

    let header: usize = symbols
        .iter()
        .enumerate()
        .map(|(id, &record)| alpha_code_len(id as u64) + alpha_code_len(record as u64) + 2)
        .sum();

    let references: usize = layout
        .edges
        .iter()
        .map(|&(source, target)| alpha_code_len(reference_value(source, target, &symbol_ids)))
        .sum();

    header + references
}
