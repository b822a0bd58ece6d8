use core::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::{
    algorithms::frequency::{FrequencyMap, Symbol},
    compressor::{CodecError, Result},
};

if_tracing! {
    use tracing::debug;
}

/// A node of a Huffman tree.
///
/// Every internal node owns exactly two children, so the tree is always strictly binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub const fn freq(&self) -> u64 {
        match self {
            Self::Leaf { freq, .. } | Self::Internal { freq, .. } => *freq,
        }
    }

    /// Joins two nodes under a new parent. `left` is the node popped first.
    pub fn merge(left: HuffNode, right: HuffNode) -> Self {
        Self::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
impl HuffNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Heap entry ordered by `(freq, seq)`.
///
/// `seq` is unique per entry, so the order is total and the pop sequence is fully determined
/// by the input.
#[derive(Debug)]
struct QueuedNode {
    freq: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.freq, self.seq).cmp(&(other.freq, other.seq))
    }
}

/// Builds a Huffman tree by repeatedly merging the two lightest nodes.
///
/// Leaves are numbered in ascending symbol order and merged nodes continue the numbering, so
/// equal frequencies always pop in the same order.
///
/// # Errors
///
/// Returns [`CodecError::EmptyAlphabet`] if `freqs` has no entries.
pub fn build_tree(freqs: &FrequencyMap) -> Result<HuffNode> {
    if freqs.is_empty() {
        return Err(CodecError::EmptyAlphabet);
    }

    let mut heap = BinaryHeap::with_capacity(freqs.len());
    let mut next_seq = 0u64;
    for (symbol, freq) in freqs.iter() {
        heap.push(Reverse(QueuedNode {
            freq,
            seq: next_seq,
            node: HuffNode::Leaf { symbol, freq },
        }));
        next_seq += 1;
    }

    let root = loop {
        let Reverse(a) = heap.pop().ok_or(CodecError::EmptyAlphabet)?;
        let Some(Reverse(b)) = heap.pop() else {
            break a.node;
        };
        let node = HuffNode::merge(a.node, b.node);
        heap.push(Reverse(QueuedNode {
            freq: node.freq(),
            seq: next_seq,
            node,
        }));
        next_seq += 1;
    };

    if_tracing! {
        debug!(target = "tree", leaves = freqs.len(), root_freq = root.freq(), "huffman tree built");
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_of(node: &HuffNode, symbol: Symbol, depth: usize) -> Option<usize> {
        match node {
            HuffNode::Leaf { symbol: s, .. } => (*s == symbol).then_some(depth),
            HuffNode::Internal { left, right, .. } => {
                depth_of(left, symbol, depth + 1).or_else(|| depth_of(right, symbol, depth + 1))
            }
        }
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        let freqs = FrequencyMap::from_symbols(b"");
        assert!(matches!(build_tree(&freqs), Err(CodecError::EmptyAlphabet)));
    }

    #[test]
    fn single_symbol_root_is_a_leaf() {
        let freqs = FrequencyMap::from_symbols(b"aaaa");
        let root = build_tree(&freqs).unwrap();
        assert_eq!(root, HuffNode::Leaf { symbol: b'a', freq: 4 });
    }

    #[test]
    fn root_frequency_is_total() {
        let freqs = FrequencyMap::from_symbols(b"the quick brown fox jumps over the lazy dog");
        let root = build_tree(&freqs).unwrap();
        assert_eq!(root.freq(), freqs.total());
        assert_eq!(root.leaf_count(), freqs.len());
    }

    #[test]
    fn most_frequent_symbol_sits_highest() {
        let freqs = FrequencyMap::from_symbols(b"aabbbcc");
        let root = build_tree(&freqs).unwrap();
        assert_eq!(depth_of(&root, b'b', 0), Some(1));
        assert_eq!(depth_of(&root, b'a', 0), Some(2));
        assert_eq!(depth_of(&root, b'c', 0), Some(2));
    }

    #[test]
    fn ties_pop_in_insertion_order() {
        // a:2 and c:2 tie; a was queued first so it becomes the left child.
        let freqs = FrequencyMap::from_symbols(b"aabbbcc");
        let root = build_tree(&freqs).unwrap();
        let HuffNode::Internal { left, right, .. } = root else {
            panic!("expected an internal root");
        };
        assert_eq!(*left, HuffNode::Leaf { symbol: b'b', freq: 3 });
        let HuffNode::Internal { left: inner_left, right: inner_right, .. } = *right else {
            panic!("expected an internal right child");
        };
        assert_eq!(*inner_left, HuffNode::Leaf { symbol: b'a', freq: 2 });
        assert_eq!(*inner_right, HuffNode::Leaf { symbol: b'c', freq: 2 });
    }

    #[test]
    fn construction_is_deterministic() {
        let freqs = FrequencyMap::from_symbols(b"abcdefabcdefaabbccddeeff");
        assert_eq!(build_tree(&freqs).unwrap(), build_tree(&freqs).unwrap());
    }
}
