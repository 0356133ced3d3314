//! Unbalanced binary search tree of strings, used as a throwaway
//! membership set during bulk operations.
//!
//! There is no rebalancing, so sorted insertion order degrades lookups to
//! O(n). Both insert and lookup walk iteratively to keep deep trees off the
//! call stack.

use std::cmp::Ordering;

#[derive(Debug)]
struct Node {
    value: String,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(value: String) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }
}

/// String membership set ordered lexicographically.
#[derive(Debug, Default)]
pub struct MembershipTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl MembershipTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct strings held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert `value`; duplicates are ignored. Returns true if it was new.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut link = &mut self.root;

        while let Some(node) = link {
            link = match value.as_str().cmp(node.value.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }

        *link = Some(Node::new(value));
        self.len += 1;
        true
    }

    /// True if `value` was inserted earlier.
    pub fn contains(&self, value: &str) -> bool {
        let mut cursor = self.root.as_deref();

        while let Some(node) = cursor {
            cursor = match value.cmp(node.value.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }

        false
    }

    /// Longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&Node> = self.root.as_deref().into_iter().collect();

        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }

        height
    }
}

impl Drop for MembershipTree {
    // Tear down iteratively; a degenerate tree would overflow recursive drop.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<S: Into<String>> FromIterator<S> for MembershipTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = Self::new();
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

impl<S: Into<String>> Extend<S> for MembershipTree {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = MembershipTree::new();
        assert!(tree.is_empty());
        assert!(!tree.contains("anything"));
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_insert_and_contains() {
        let tree: MembershipTree = ["m", "c", "x", "a", "e"].into_iter().collect();

        for s in ["m", "c", "x", "a", "e"] {
            assert!(tree.contains(s), "missing {}", s);
        }
        assert!(!tree.contains("b"));
        assert!(!tree.contains("z"));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut tree = MembershipTree::new();
        assert!(tree.insert("same"));
        assert!(!tree.insert("same"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_sorted_input_degenerates() {
        let tree: MembershipTree = (0..50).map(|i| format!("{:03}", i)).collect();
        assert_eq!(tree.height(), 50);
        assert!(tree.contains("049"));
    }

    #[test]
    fn test_deep_tree_drops_cleanly() {
        let tree: MembershipTree = (0..10_000).map(|i| format!("{:05}", i)).collect();
        assert_eq!(tree.len(), 10_000);
        drop(tree);
    }

    #[test]
    fn test_case_sensitive_ordering() {
        let tree: MembershipTree = ["Task"].into_iter().collect();
        assert!(tree.contains("Task"));
        assert!(!tree.contains("task"));
    }
}
