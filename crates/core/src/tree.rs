//! Huffman tree construction.
//!
//! Nodes are merged from a binary min-heap keyed by (frequency, symbol, rank).
//! The key order fixes which subtree lands on the left at every merge, and
//! therefore every bit of the output. Encoder and decoder both rebuild the
//! tree from the same frequency table, so the ordering must never change.
//!
//! # Key Rules
//!
//! - Leaves: symbol is the byte value, rank is `u32::MAX`
//! - Internal nodes: symbol is 0, rank is `u32::MAX - 1 - merge_index`, so the
//!   newest internal node wins a tie against older ones and against leaf 0
//! - The first node extracted becomes the left child
//!
//! A lone symbol gets a zero-frequency sentinel leaf as its right sibling so
//! its code is the single bit `0`.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::{HuffmanError, Result};
use crate::freq::FrequencyTable;

/// Symbol value carried by the sentinel leaf of a single-symbol tree.
pub const SENTINEL_SYMBOL: u8 = 0;

const LEAF_RANK: u32 = u32::MAX;

/// A node of an immutable Huffman tree.
///
/// # Invariants
/// - An internal node's frequency is the sum of its children's
/// - Only the sentinel leaf has frequency 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// True for the synthetic sibling of a single-symbol tree.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Node::Leaf { freq: 0, .. })
    }
}

/// Heap entry ordering nodes by their tie-break key.
#[derive(Debug)]
struct QueueEntry {
    freq: u64,
    symbol: u8,
    rank: u32,
    node: Node,
}

impl QueueEntry {
    fn leaf(symbol: u8, freq: u64) -> Self {
        Self {
            freq,
            symbol,
            rank: LEAF_RANK,
            node: Node::Leaf { symbol, freq },
        }
    }

    fn key(&self) -> (u64, u8, u32) {
        (self.freq, self.symbol, self.rank)
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// An immutable Huffman tree that never consists of a single bare leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyFrequencyTable` if every count is zero.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<Reverse<QueueEntry>> = freqs
            .present()
            .map(|(symbol, freq)| Reverse(QueueEntry::leaf(symbol, freq)))
            .collect();

        match heap.len() {
            0 => return Err(HuffmanError::EmptyFrequencyTable.into()),
            1 => {
                let Some(Reverse(only)) = heap.pop() else {
                    return Err(HuffmanError::EmptyFrequencyTable.into());
                };
                trace!(symbol = only.symbol, "single symbol, adding sentinel leaf");
                let sentinel = Node::Leaf {
                    symbol: SENTINEL_SYMBOL,
                    freq: 0,
                };
                let root = Node::Internal {
                    freq: only.freq,
                    left: Box::new(only.node),
                    right: Box::new(sentinel),
                };
                return Ok(Self { root });
            }
            _ => {}
        }

        let mut merge_index: u32 = 0;
        while heap.len() > 1 {
            let (Some(Reverse(a)), Some(Reverse(b))) = (heap.pop(), heap.pop()) else {
                break;
            };
            // Every internal weight is bounded by the table total, which fits a u64
            let freq = a.freq + b.freq;
            trace!(
                merge_index,
                left = ?a.key(),
                right = ?b.key(),
                freq,
                "merging nodes"
            );
            heap.push(Reverse(QueueEntry {
                freq,
                symbol: 0,
                rank: LEAF_RANK - 1 - merge_index,
                node: Node::Internal {
                    freq,
                    left: Box::new(a.node),
                    right: Box::new(b.node),
                },
            }));
            merge_index += 1;
        }

        heap.pop()
            .map(|Reverse(entry)| Self { root: entry.node })
            .ok_or_else(|| HuffmanError::EmptyFrequencyTable.into())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Code length of every reachable symbol, as (symbol, depth) pairs.
    pub fn depths(&self) -> Vec<(u8, usize)> {
        let mut out = Vec::new();
        collect_depths(&self.root, 0, &mut out);
        out
    }
}

fn collect_depths(node: &Node, depth: usize, out: &mut Vec<(u8, usize)>) {
    match node {
        Node::Leaf { symbol, .. } if !node.is_sentinel() => out.push((*symbol, depth)),
        Node::Leaf { .. } => {}
        Node::Internal { left, right, .. } => {
            collect_depths(left, depth + 1, out);
            collect_depths(right, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(u8, u64)]) -> FrequencyTable {
        FrequencyTable::from_pairs(pairs.iter().copied()).unwrap()
    }

    fn assert_weights_sum(node: &Node) {
        if let Node::Internal { freq, left, right } = node {
            assert_eq!(*freq, left.freq() + right.freq());
            assert_weights_sum(left);
            assert_weights_sum(right);
        }
    }

    #[test]
    fn test_empty_table_fails() {
        let result = HuffmanTree::build(&FrequencyTable::new());
        assert!(matches!(
            result,
            Err(crate::error::Error::Huffman(HuffmanError::EmptyFrequencyTable))
        ));
    }

    #[test]
    fn test_single_symbol_gets_sentinel() {
        let tree = HuffmanTree::build(&table(&[(b'Z', 5)])).unwrap();
        match tree.root() {
            Node::Internal { freq, left, right } => {
                assert_eq!(*freq, 5);
                assert_eq!(**left, Node::Leaf { symbol: b'Z', freq: 5 });
                assert!(right.is_sentinel());
            }
            other => panic!("expected internal root, got {:?}", other),
        }
        assert_eq!(tree.depths(), vec![(b'Z', 1)]);
    }

    #[test]
    fn test_equal_frequencies_lower_symbol_left() {
        let tree = HuffmanTree::build(&table(&[(b'b', 1), (b'a', 1)])).unwrap();
        match tree.root() {
            Node::Internal { left, right, .. } => {
                assert_eq!(**left, Node::Leaf { symbol: b'a', freq: 1 });
                assert_eq!(**right, Node::Leaf { symbol: b'b', freq: 1 });
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_order_aaaabbbccd() {
        // D+C merge first, that subtree ties with B at 3 and wins on symbol 0
        let tree =
            HuffmanTree::build(&table(&[(b'A', 4), (b'B', 3), (b'C', 2), (b'D', 1)])).unwrap();
        let Node::Internal { left, right, freq } = tree.root() else {
            panic!("expected internal root");
        };
        assert_eq!(*freq, 10);
        assert_eq!(**left, Node::Leaf { symbol: b'A', freq: 4 });

        let Node::Internal { left: dc, right: b, .. } = right.as_ref() else {
            panic!("expected internal right child");
        };
        assert_eq!(**b, Node::Leaf { symbol: b'B', freq: 3 });
        let Node::Internal { left: d, right: c, .. } = dc.as_ref() else {
            panic!("expected D/C subtree");
        };
        assert_eq!(**d, Node::Leaf { symbol: b'D', freq: 1 });
        assert_eq!(**c, Node::Leaf { symbol: b'C', freq: 2 });

        let mut depths = tree.depths();
        depths.sort();
        assert_eq!(depths, vec![(b'A', 1), (b'B', 2), (b'C', 3), (b'D', 3)]);
    }

    #[test]
    fn test_internal_beats_leaf_zero_on_tie() {
        // 1+1 makes an internal node of weight 2 that ties with leaf 0
        let tree = HuffmanTree::build(&table(&[(0, 2), (5, 1), (6, 1)])).unwrap();
        let Node::Internal { left, right, .. } = tree.root() else {
            panic!("expected internal root");
        };
        assert!(!left.is_leaf());
        assert_eq!(**right, Node::Leaf { symbol: 0, freq: 2 });
    }

    #[test]
    fn test_newest_internal_wins_tie() {
        // Four weight-1 leaves make two weight-2 internals; the second is left
        let tree = HuffmanTree::build(&table(&[(1, 1), (2, 1), (3, 1), (4, 1)])).unwrap();
        let Node::Internal { left, right, .. } = tree.root() else {
            panic!("expected internal root");
        };
        let Node::Internal { left: first, .. } = left.as_ref() else {
            panic!("expected internal left");
        };
        let Node::Internal { left: second, .. } = right.as_ref() else {
            panic!("expected internal right");
        };
        assert_eq!(**first, Node::Leaf { symbol: 3, freq: 1 });
        assert_eq!(**second, Node::Leaf { symbol: 1, freq: 1 });
    }

    #[test]
    fn test_weights_sum_full_alphabet() {
        let pairs: Vec<(u8, u64)> = (0..=255u8).map(|b| (b, b as u64 % 7 + 1)).collect();
        let tree = HuffmanTree::build(&table(&pairs)).unwrap();
        assert_weights_sum(tree.root());
        assert_eq!(tree.root().freq(), pairs.iter().map(|p| p.1).sum::<u64>());
        assert_eq!(tree.depths().len(), 256);
    }

    #[test]
    fn test_deterministic() {
        let freqs = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        assert_eq!(
            HuffmanTree::build(&freqs).unwrap(),
            HuffmanTree::build(&freqs).unwrap()
        );
    }
}
