//! Code table generation.
//!
//! A depth-first walk assigns `0` to every left edge and `1` to every right
//! edge; the path to a leaf is that symbol's code. The sentinel leaf of a
//! single-symbol tree gets no entry.

use std::fmt;

use crate::freq::ALPHABET_SIZE;
use crate::tree::{HuffmanTree, Node};

/// A variable-length code word, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    fn with(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping for every symbol in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Walk the tree and collect every leaf's path.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self {
            codes: std::array::from_fn(|_| None),
        };
        table.assign(tree.root(), Code::default());
        table
    }

    fn assign(&mut self, node: &Node, path: Code) {
        match node {
            Node::Leaf { .. } if node.is_sentinel() => {}
            Node::Leaf { symbol, .. } => self.codes[*symbol as usize] = Some(path),
            Node::Internal { left, right, .. } => {
                self.assign(left, path.with(false));
                self.assign(right, path.with(true));
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (symbol, code) pairs ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }
}
