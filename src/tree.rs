//! Huffman tree built by repeatedly merging the two lightest nodes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::frequency::{FrequencyTable, INTERNAL_MARKER, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        count: u64,
    },
    Internal {
        count: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    /// The leaf's symbol, or `INTERNAL_MARKER` for a merge node.
    pub fn symbol(&self) -> Symbol {
        match self {
            Node::Leaf { symbol, .. } => *symbol,
            Node::Internal { .. } => INTERNAL_MARKER,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn collect_leaves(&self, out: &mut Vec<Symbol>) {
        match self {
            Node::Leaf { symbol, .. } => out.push(*symbol),
            Node::Internal { zero, one, .. } => {
                zero.collect_leaves(out);
                one.collect_leaves(out);
            }
        }
    }
}

/// Queue entry for the merge loop. The heap pops the lowest count first and,
/// among equal counts, the entry that was pushed first.
struct Pending {
    count: u64,
    seq: usize,
    node: Node,
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let tree = Self::from_counts(table.iter())?;
        debug!(leaves = table.len(), weight = tree.root.count(), "built huffman tree");
        Ok(tree)
    }

    /// Build from raw `(symbol, count)` pairs, inserted in iteration order.
    ///
    /// A single pair yields a tree whose root is that leaf.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, u64)>,
    {
        let mut heap: BinaryHeap<Pending> = counts
            .into_iter()
            .enumerate()
            .map(|(seq, (symbol, count))| Pending {
                count,
                seq,
                node: Node::Leaf { symbol, count },
            })
            .collect();
        let mut next_seq = heap.len();

        while heap.len() > 1 {
            let (Some(zero), Some(one)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let count = zero.count + one.count;
            heap.push(Pending {
                count,
                seq: next_seq,
                node: Node::Internal {
                    count,
                    zero: Box::new(zero.node),
                    one: Box::new(one.node),
                },
            });
            next_seq += 1;
        }

        heap.pop()
            .map(|pending| Self { root: pending.node })
            .ok_or(Error::EmptyTable)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Leaf symbols, zero branch before one branch.
    pub fn leaves(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{END_OF_STREAM, Source};

    fn leaf(symbol: Symbol, count: u64) -> Node {
        Node::Leaf { symbol, count }
    }

    #[test]
    fn test_single_repeated_byte_gives_two_leaves() {
        let table = FrequencyTable::build(Source::Bytes(b"AAAAA")).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(
            tree.root(),
            &Node::Internal {
                count: 6,
                zero: Box::new(leaf(END_OF_STREAM, 1)),
                one: Box::new(leaf(65, 5)),
            }
        );
    }

    #[test]
    fn test_empty_input_root_is_end_of_stream_leaf() {
        let table = FrequencyTable::build(Source::Bytes(b"")).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.root(), &leaf(END_OF_STREAM, 1));
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_merge_order_and_first_inserted_tie_break() {
        // a:1 b:1 c:2 -> (a,b) merged first, then the leaf c (inserted before
        // the merge node) wins the 2-vs-2 tie and becomes the zero child.
        let tree = HuffmanTree::from_counts([(97, 1), (98, 1), (99, 2)]).unwrap();
        assert_eq!(
            tree.root(),
            &Node::Internal {
                count: 4,
                zero: Box::new(leaf(99, 2)),
                one: Box::new(Node::Internal {
                    count: 2,
                    zero: Box::new(leaf(97, 1)),
                    one: Box::new(leaf(98, 1)),
                }),
            }
        );
    }

    #[test]
    fn test_same_table_same_tree() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let table = FrequencyTable::build(Source::Bytes(data)).unwrap();
        let first = HuffmanTree::build(&table).unwrap();
        let second = HuffmanTree::build(&table.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_internal_nodes_report_marker_and_sum() {
        let tree = HuffmanTree::from_counts([(1, 3), (2, 4)]).unwrap();
        assert_eq!(tree.root().symbol(), INTERNAL_MARKER);
        assert_eq!(tree.root().count(), 7);
    }

    #[test]
    fn test_leaves_match_table_keys() {
        let table = FrequencyTable::build(Source::Bytes(b"mississippi river")).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        let mut leaves = tree.leaves();
        leaves.sort_unstable();
        let keys: Vec<Symbol> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(leaves, keys);
    }

    #[test]
    fn test_lone_entry_is_root_and_empty_is_error() {
        let tree = HuffmanTree::from_counts([(65, 5)]).unwrap();
        assert_eq!(tree.root(), &leaf(65, 5));

        let err = HuffmanTree::from_counts(std::iter::empty()).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }
}
