// ---------------------------------------------------------------------------
// Internal node records for the A* working set
// ---------------------------------------------------------------------------

/// Which of the A* sets a cell currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeState {
    Unseen,
    Open,
    Closed,
}

/// Best-known search data for one cell, stored flat and indexed row-major.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) parent: usize,
    /// Sequence number of the latest heap entry pushed for this cell.
    pub(crate) seq: u64,
    pub(crate) state: NodeState,
}

impl Node {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g + self.h
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: usize::MAX,
            seq: 0,
            state: NodeState::Unseen,
        }
    }
}

/// Priority key of an open-set entry: lowest `f`, then lowest `h`, then
/// earliest insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Priority {
    pub(crate) f: i32,
    pub(crate) h: i32,
    pub(crate) seq: u64,
}

/// Heap entry referring into the node array.
///
/// Entries are never updated in place: a cheaper path pushes a fresh entry
/// and the older one becomes stale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) key: Priority,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other.key.cmp(&self.key)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn entry(idx: usize, f: i32, h: i32, seq: u64) -> NodeRef {
        NodeRef {
            idx,
            key: Priority { f, h, seq },
        }
    }

    #[test]
    fn lowest_f_pops_first() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(0, 9, 0, 0));
        heap.push(entry(1, 4, 4, 1));
        heap.push(entry(2, 6, 1, 2));
        assert_eq!(heap.pop().map(|e| e.idx), Some(1));
        assert_eq!(heap.pop().map(|e| e.idx), Some(2));
        assert_eq!(heap.pop().map(|e| e.idx), Some(0));
    }

    #[test]
    fn ties_broken_by_h_then_insertion_order() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(0, 8, 5, 0));
        heap.push(entry(1, 8, 2, 3));
        heap.push(entry(2, 8, 2, 1));
        assert_eq!(heap.pop().map(|e| e.idx), Some(2));
        assert_eq!(heap.pop().map(|e| e.idx), Some(1));
        assert_eq!(heap.pop().map(|e| e.idx), Some(0));
    }

    #[test]
    fn default_node_is_unseen_without_parent() {
        let n = Node::default();
        assert_eq!(n.state, NodeState::Unseen);
        assert_eq!(n.parent, usize::MAX);
    }
}
