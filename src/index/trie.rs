use crate::index::types::{Entry, NodeId, NodeSignature, PackConfig, TrieNode};
use crate::index::writer::PackWriter;
use crate::utils::{extract_words, is_normalized, normalize_word};
use rustc_hash::FxHashMap;

/// Root node id; the root is always the first node allocated
pub const ROOT: NodeId = 0;

/// Mutable word trie that compacts itself into a DAWG.
///
/// Nodes live in an arena and are addressed by [`NodeId`], so a node can be
/// shared by several parents once suffixes are merged. Words must be inserted
/// in ascending order: each insertion closes the part of the previous word's
/// path that the new word leaves, and that closed subtree is merged into the
/// suffix cache right away.
#[derive(Debug, Clone)]
pub struct Trie {
    pub(crate) nodes: Vec<TrieNode>,
    pub(crate) root: NodeId,
    /// Signature -> canonical node, for the current build only
    pub(crate) suffixes: FxHashMap<NodeSignature, NodeId>,
    last_word: String,
    word_count: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            root: ROOT,
            suffixes: FxHashMap::default(),
            last_word: String::new(),
            word_count: 0,
        }
    }

    /// Build a trie from raw text (any non-letter separates words)
    pub fn from_text(text: &str) -> Self {
        let mut trie = Self::new();
        for word in extract_words(text) {
            trie.insert(&word);
        }
        trie
    }

    /// Build a trie from words in any order
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        crate::utils::sort_unique(&mut normalized);

        let mut trie = Self::new();
        for word in &normalized {
            trie.insert(word);
        }
        trie
    }

    /// Insert a word.
    ///
    /// The word is normalized first; words that normalize to nothing are
    /// ignored, as is a repeat of the previous word.
    ///
    /// # Panics
    /// - If the normalized word sorts before the previously inserted word.
    /// - If the trie has already been optimized.
    pub fn insert(&mut self, word: &str) {
        let word = if is_normalized(word) {
            word.to_string()
        } else {
            normalize_word(word)
        };
        if word.is_empty() {
            return;
        }

        if word.as_str() <= self.last_word.as_str() {
            assert!(
                word == self.last_word,
                "words must be inserted in ascending order: {:?} after {:?}",
                word,
                self.last_word
            );
            return;
        }

        if self.insert_at(self.root, &word) {
            self.word_count += 1;
        }

        let last_word = std::mem::replace(&mut self.last_word, word);
        if self.last_word.starts_with(last_word.as_str()) {
            return;
        }

        // The previous word's branch is complete; merge it into the suffix cache
        if let Some((parent, label)) = self.unique_node(&last_word, &self.last_word) {
            let closed = self.nodes[parent as usize].entries[&label];
            if let Entry::Child(child) = closed {
                let canonical = self.combine_suffixes(child);
                if canonical != child {
                    self.node_mut(parent).entries.insert(label, Entry::Child(canonical));
                }
            }
        }
    }

    /// Insert `word` below `node`. Returns false for a duplicate.
    fn insert_at(&mut self, mut node: NodeId, word: &str) -> bool {
        let mut word = word;

        loop {
            let Some(&first) = word.as_bytes().first() else {
                let added = !self.nodes[node as usize].terminal;
                self.node_mut(node).terminal = true;
                return added;
            };

            let Some((label, entry)) = self.nodes[node as usize]
                .entry_starting_with(first)
                .map(|(label, entry)| (label.to_string(), entry))
            else {
                // No shared prefix: the whole remainder becomes a terminal edge
                self.node_mut(node).entries.insert(word.to_string(), Entry::Terminal);
                return true;
            };

            let common = common_prefix_len(&label, word);

            match entry {
                Entry::Child(child) if common == label.len() => {
                    node = child;
                    word = &word[common..];
                }
                Entry::Terminal if label == word => return false,
                _ => {
                    let mut split = TrieNode::default();
                    let label_rest = &label[common..];
                    match (label_rest.is_empty(), entry) {
                        (true, Entry::Terminal) => split.terminal = true,
                        (true, Entry::Child(_)) => unreachable!("full label match descends"),
                        (false, _) => {
                            split.entries.insert(label_rest.to_string(), entry);
                        }
                    }

                    let word_rest = &word[common..];
                    if word_rest.is_empty() {
                        split.terminal = true;
                    } else {
                        split.entries.insert(word_rest.to_string(), Entry::Terminal);
                    }

                    let split_id = self.alloc(split);
                    let parent = self.node_mut(node);
                    parent.entries.remove(&label);
                    parent
                        .entries
                        .insert(label[..common].to_string(), Entry::Child(split_id));
                    return true;
                }
            }
        }
    }

    /// Find the highest edge on the path to `word` that is not on the path to
    /// `other`. Returns the parent node and the edge label.
    fn unique_node(&self, word: &str, other: &str) -> Option<(NodeId, String)> {
        let mut node = self.root;
        let mut word = word;
        let mut other = other;

        loop {
            let first = *word.as_bytes().first()?;
            let (label, entry) = self.nodes[node as usize].entry_starting_with(first)?;
            let child = entry.child()?;
            if !word.starts_with(label) {
                return None;
            }
            if !other.starts_with(label) {
                return Some((node, label.to_string()));
            }
            node = child;
            word = &word[label.len()..];
            other = &other[label.len()..];
        }
    }

    /// True if `word` was inserted
    pub fn is_word(&self, word: &str) -> bool {
        let mut node = &self.nodes[self.root as usize];
        let mut rest = word;

        loop {
            let Some(&first) = rest.as_bytes().first() else {
                return node.terminal;
            };
            let Some((label, entry)) = node.entry_starting_with(first) else {
                return false;
            };
            match entry {
                Entry::Terminal => return label == rest,
                Entry::Child(child) => {
                    if !rest.starts_with(label) {
                        return false;
                    }
                    rest = &rest[label.len()..];
                    node = &self.nodes[child as usize];
                }
            }
        }
    }

    /// Number of distinct words inserted
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of nodes reachable from the root
    pub fn node_count(&self) -> usize {
        self.post_order_from(self.root, |_| false).len()
    }

    /// The root node
    pub fn root(&self) -> &TrieNode {
        &self.nodes[self.root as usize]
    }

    /// A node by id
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id as usize]
    }

    /// Optimize and serialize the trie.
    ///
    /// Calling this repeatedly returns the same string.
    pub fn pack(&mut self) -> String {
        self.pack_with_config(&PackConfig::default())
    }

    /// Optimize and serialize the trie with explicit packer settings
    pub fn pack_with_config(&mut self, config: &PackConfig) -> String {
        self.optimize();
        PackWriter::new(self, config).write()
    }

    /// Node ids reachable from `start` in post-order (children in label
    /// order before their parent). Nodes for which `skip` returns true are
    /// neither visited nor descended into. Shared nodes appear once.
    pub(crate) fn post_order_from(
        &self,
        start: NodeId,
        skip: impl Fn(&TrieNode) -> bool,
    ) -> Vec<NodeId> {
        let mut order = Vec::new();
        if skip(&self.nodes[start as usize]) {
            return order;
        }

        let mut visited = vec![false; self.nodes.len()];
        visited[start as usize] = true;

        // (node, its children, next child to visit)
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = vec![(
            start,
            self.nodes[start as usize].children().collect(),
            0,
        )];

        while let Some(frame) = stack.last_mut() {
            if frame.2 == frame.1.len() {
                order.push(frame.0);
                stack.pop();
                continue;
            }

            let child = frame.1[frame.2];
            frame.2 += 1;

            if visited[child as usize] || skip(&self.nodes[child as usize]) {
                continue;
            }
            visited[child as usize] = true;
            stack.push((child, self.nodes[child as usize].children().collect(), 0));
        }

        order
    }

    fn alloc(&mut self, node: TrieNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Mutable access for insertion; frozen nodes are immutable
    fn node_mut(&mut self, id: NodeId) -> &mut TrieNode {
        let node = &mut self.nodes[id as usize];
        assert!(
            !node.frozen,
            "cannot insert into a frozen node (was the trie already optimized?)"
        );
        node
    }
}

/// Byte length of the common prefix of two ASCII strings
#[inline]
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}
