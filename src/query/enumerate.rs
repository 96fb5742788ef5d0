use crate::index::reader::{PackedTrie, RecordEntries};
use crate::index::types::MAX_WORD;
use std::ops::ControlFlow;

/// Smallest string that sorts after every string starting with `s`.
///
/// Increments the last character, dropping trailing characters that have no
/// successor. An empty (or fully dropped) string yields [`MAX_WORD`].
pub fn beyond(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return chars.into_iter().collect();
        }
    }
    MAX_WORD.to_string()
}

fn next_char(c: char) -> Option<char> {
    let mut code = c as u32 + 1;
    // Skip the surrogate range
    if (0xD800..=0xDFFF).contains(&code) {
        code = 0xE000;
    }
    char::from_u32(code)
}

/// Pending entries of one record during a walk
struct Frame<'a> {
    entries: RecordEntries<'a>,
    prefix_len: usize,
    inode: usize,
}

impl PackedTrie {
    /// Words `w` with `from <= w < beyond` in ascending order.
    ///
    /// `beyond = None` means every word starting with `from`. The walk stops
    /// as soon as `limit` words were collected.
    pub fn words(&self, from: &str, beyond: Option<&str>, limit: Option<usize>) -> Vec<String> {
        if limit == Some(0) {
            return Vec::new();
        }
        let upper = match beyond {
            Some(b) => b.to_string(),
            None => self::beyond(from),
        };

        let mut words = Vec::new();
        let _ = self.enumerate(from, &upper, |word| {
            words.push(word.to_string());
            if limit.is_some_and(|max| words.len() >= max) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        words
    }

    /// Call `callback` for every word `w` with `from <= w < beyond`, in
    /// ascending order, until it breaks.
    pub fn enumerate<F>(&self, from: &str, beyond: &str, mut callback: F) -> ControlFlow<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        if from >= beyond {
            return ControlFlow::Continue(());
        }
        let mut prefix = String::new();
        let mut stack = vec![Frame {
            entries: self.entries(0),
            prefix_len: 0,
            inode: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };
            let inode = frame.inode;
            prefix.truncate(frame.prefix_len);
            prefix.push_str(entry.label);

            // The walk is ascending, so nothing after this can be in range
            if prefix.as_str() >= beyond {
                return ControlFlow::Continue(());
            }

            // Every word below this entry sorts before `from`
            let shared = prefix.len().min(from.len());
            if prefix.as_bytes() < &from.as_bytes()[..shared] {
                continue;
            }

            match entry.code {
                None => {
                    if prefix.as_str() >= from {
                        callback(&prefix)?;
                    }
                }
                Some(code) => {
                    let Some(child) = self.inode_from_ref(code, inode) else {
                        continue;
                    };
                    if self.is_terminal(child) && prefix.as_str() >= from {
                        callback(&prefix)?;
                    }
                    stack.push(Frame {
                        entries: self.entries(child),
                        prefix_len: prefix.len(),
                        inode: child,
                    });
                }
            }
        }

        ControlFlow::Continue(())
    }
}
