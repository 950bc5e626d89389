//! Symbol -> root-to-leaf path ("0" = zero child, "1" = one child).

use std::collections::BTreeMap;

use crate::frequency::{FrequencyTable, Symbol};
use crate::tree::{HuffmanTree, Node};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodingMap {
    codes: BTreeMap<Symbol, String>,
}

impl EncodingMap {
    pub fn build(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        collect_codes(tree.root(), String::new(), &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// Σ count · code length over every symbol of `table`, i.e. the payload
    /// size in bits of the input that produced the table. Saturates for
    /// crafted tables whose counts no real input could have.
    pub fn weighted_path_length(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(symbol, count)| {
                self.get(symbol)
                    .map(|code| count.saturating_mul(code.len() as u64))
            })
            .fold(0, u64::saturating_add)
    }
}

// Each branch gets its own prefix, so siblings never see each other's bits.
fn collect_codes(node: &Node, prefix: String, codes: &mut BTreeMap<Symbol, String>) {
    match node {
        Node::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix);
        }
        Node::Internal { zero, one, .. } => {
            collect_codes(zero, format!("{prefix}0"), codes);
            collect_codes(one, format!("{prefix}1"), codes);
        }
    }
}
