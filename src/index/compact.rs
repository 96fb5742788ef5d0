use crate::index::trie::Trie;
use crate::index::types::{Entry, NodeId};
use rustc_hash::FxHashMap;
use tracing::debug;

impl Trie {
    /// Compact the trie into a DAWG.
    ///
    /// Merges structurally identical subtrees and then folds singleton chains
    /// into their parents. Must run after the last insertion; running it again
    /// is a no-op.
    pub fn optimize(&mut self) {
        if self.nodes[self.root as usize].frozen {
            return;
        }

        let before = self.node_count();
        self.root = self.combine_suffixes(self.root);

        // The cache only makes sense while nodes can still be added
        let suffixes = std::mem::take(&mut self.suffixes);
        let signatures = suffixes.len();
        drop(suffixes);

        let folded = self.collapse_chains();

        debug!(
            nodes_before = before,
            nodes = self.node_count(),
            signatures,
            folded,
            "optimized trie"
        );
    }

    /// Merge every non-frozen node reachable from `start` into the suffix
    /// cache, bottom-up. Returns the canonical id for `start`.
    pub(crate) fn combine_suffixes(&mut self, start: NodeId) -> NodeId {
        let order = self.post_order_from(start, |node| node.frozen);
        let mut redirects: FxHashMap<NodeId, NodeId> = FxHashMap::default();

        for id in order {
            let node = &mut self.nodes[id as usize];
            for entry in node.entries.values_mut() {
                if let Entry::Child(child) = *entry {
                    if let Some(&canonical) = redirects.get(&child) {
                        *entry = Entry::Child(canonical);
                    }
                }
            }

            let signature = node.signature();
            match self.suffixes.get(&signature) {
                Some(&canonical) => {
                    redirects.insert(id, canonical);
                }
                None => {
                    node.frozen = true;
                    self.suffixes.insert(signature, id);
                }
            }
        }

        redirects.get(&start).copied().unwrap_or(start)
    }

    /// Number of incoming edges per node id, counted over the nodes
    /// reachable from the root. Unreachable nodes report 0.
    pub(crate) fn in_degrees(&self) -> Vec<u32> {
        let mut degrees = vec![0u32; self.nodes.len()];
        for id in self.post_order_from(self.root, |_| false) {
            for child in self.nodes[id as usize].children() {
                degrees[child as usize] += 1;
            }
        }
        degrees
    }

    /// Fold non-terminal single-entry children with one parent into that
    /// parent. Returns the number of folded nodes.
    fn collapse_chains(&mut self) -> usize {
        let degrees = self.in_degrees();
        let mut folded = 0;

        // Children come first, so a child's own chain is already folded
        for id in self.post_order_from(self.root, |_| false) {
            let mut replacements = Vec::new();
            for (label, entry) in &self.nodes[id as usize].entries {
                let Entry::Child(child) = *entry else {
                    continue;
                };
                if degrees[child as usize] != 1 {
                    continue;
                }
                let child_node = &self.nodes[child as usize];
                if child_node.terminal || child_node.entries.len() != 1 {
                    continue;
                }
                if let Some((child_label, child_entry)) = child_node.entries.iter().next() {
                    let merged = format!("{}{}", label, child_label);
                    replacements.push((label.clone(), merged, *child_entry));
                }
            }

            let node = &mut self.nodes[id as usize];
            for (old, new, entry) in replacements {
                node.entries.remove(&old);
                node.entries.insert(new, entry);
                folded += 1;
            }
        }

        folded
    }
}
