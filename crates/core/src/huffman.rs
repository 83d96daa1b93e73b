//! Huffman tree construction and canonical code assignment.
//!
//! # Tree construction
//!
//! Nodes live in a flat `Vec` and refer to their children by index. The
//! priority queue is ordered by `(weight, tie_key)`:
//!
//! - a leaf's tie key is its symbol value, so `END_OF_STREAM` (256) comes
//!   after every byte of the same weight
//! - the empty-input placeholder leaf uses 257
//! - the n-th internal node uses `258 + n`
//!
//! Tie keys are unique, so the order is total and the tree shape depends
//! only on the frequency table. The first node popped becomes the left
//! child (bit 0), the second the right child (bit 1).
//!
//! # Canonical codes
//!
//! Only code lengths are taken from the tree. Symbols are sorted by
//! `(length, symbol)` and given consecutive codes, shifting left whenever
//! the length grows. The decoder rebuilds the same codes from the lengths
//! in the container header.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol, ALPHABET_SIZE, END_OF_STREAM};

/// Longest code the bit writer can emit in a single call.
pub const MAX_CODE_LENGTH: usize = 64;

const PLACEHOLDER_TIE_KEY: u32 = ALPHABET_SIZE as u32;
const FIRST_INTERNAL_TIE_KEY: u32 = ALPHABET_SIZE as u32 + 1;

/// One codeword: the low `length` bits of `bits`, sent MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub length: u8,
}

impl Code {
    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.length <= other.length && other.bits >> (other.length - self.length) == self.bits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Symbol),
    /// Stand-in second leaf for an input with no bytes. Never gets a code.
    Placeholder,
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode {
    pub weight: u64,
    pub kind: NodeKind,
}

/// A Huffman tree stored as a flat node array.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: usize,
}

impl HuffmanTree {
    /// Build the tree for `freqs`.
    ///
    /// # Errors
    /// `HuffmanError::EmptyFrequencyTable` if no symbol has a non-zero count.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut nodes = Vec::with_capacity(2 * ALPHABET_SIZE);
        let mut heap = BinaryHeap::with_capacity(ALPHABET_SIZE + 1);

        for (symbol, count) in freqs.present_symbols() {
            heap.push(Reverse((count, symbol as u32, nodes.len())));
            nodes.push(HuffmanNode {
                weight: count,
                kind: NodeKind::Leaf(symbol),
            });
        }

        match heap.len() {
            0 => return Err(HuffmanError::EmptyFrequencyTable.into()),
            1 => {
                heap.push(Reverse((0, PLACEHOLDER_TIE_KEY, nodes.len())));
                nodes.push(HuffmanNode {
                    weight: 0,
                    kind: NodeKind::Placeholder,
                });
            }
            _ => {}
        }

        let mut tie_key = FIRST_INTERNAL_TIE_KEY;
        loop {
            let Reverse((left_weight, _, left)) =
                heap.pop().ok_or(HuffmanError::EmptyFrequencyTable)?;
            let Some(Reverse((right_weight, _, right))) = heap.pop() else {
                trace!(nodes = nodes.len(), root = left, "huffman tree built");
                return Ok(Self { nodes, root: left });
            };

            let weight = left_weight + right_weight;
            heap.push(Reverse((weight, tie_key, nodes.len())));
            nodes.push(HuffmanNode {
                weight,
                kind: NodeKind::Internal { left, right },
            });
            tie_key += 1;
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &HuffmanNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of every leaf, indexed by symbol. Absent symbols get 0.
    ///
    /// # Errors
    /// `HuffmanError::CodeLengthTooLong` if a leaf is deeper than
    /// `MAX_CODE_LENGTH`.
    pub fn code_lengths(&self) -> Result<[u8; ALPHABET_SIZE]> {
        let mut lengths = [0u8; ALPHABET_SIZE];
        // explicit stack: a skewed tree can be far deeper than is comfortable
        // for recursion
        let mut stack = vec![(self.root, 0usize)];

        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index].kind {
                NodeKind::Leaf(symbol) => {
                    if depth > MAX_CODE_LENGTH {
                        return Err(HuffmanError::CodeLengthTooLong {
                            length: depth,
                            max: MAX_CODE_LENGTH,
                        }
                        .into());
                    }
                    lengths[symbol as usize] = depth as u8;
                }
                NodeKind::Placeholder => {}
                NodeKind::Internal { left, right } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        Ok(lengths)
    }
}

/// Symbol to codeword mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Derive canonical codes from the tree's leaf depths.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        Self::from_lengths(&tree.code_lengths()?)
    }

    /// Assign canonical codes to a code-length table (0 = absent).
    ///
    /// The lengths must describe a complete prefix code. The one exception
    /// is a lone symbol of length 1, which is what an empty input produces.
    ///
    /// # Errors
    /// `HuffmanError::InvalidCodeLengths` when the lengths are empty, too
    /// long, oversubscribed or incomplete.
    pub fn from_lengths(lengths: &[u8; ALPHABET_SIZE]) -> Result<Self> {
        let mut order: Vec<(u8, Symbol)> = lengths
            .iter()
            .enumerate()
            .filter(|(_, &length)| length > 0)
            .map(|(symbol, &length)| (length, symbol as Symbol))
            .collect();

        if order.is_empty() {
            return Err(invalid_lengths("no symbol has a code"));
        }
        if let Some(&(length, symbol)) = order
            .iter()
            .find(|(length, _)| *length as usize > MAX_CODE_LENGTH)
        {
            return Err(invalid_lengths(format!(
                "symbol {symbol} has length {length}, max is {MAX_CODE_LENGTH}"
            )));
        }

        // Kraft sum scaled by 2^64
        let kraft: u128 = order
            .iter()
            .map(|&(length, _)| 1u128 << (MAX_CODE_LENGTH - length as usize))
            .sum();
        let full = 1u128 << MAX_CODE_LENGTH;
        let lone_short_code = order.len() == 1 && order[0].0 == 1;
        if kraft > full {
            return Err(invalid_lengths("code lengths are oversubscribed"));
        }
        if kraft < full && !lone_short_code {
            return Err(invalid_lengths("code lengths leave unused codes"));
        }

        order.sort_unstable();

        let mut codes = [None; ALPHABET_SIZE];
        let mut next = 0u64;
        let mut prev_length = order[0].0;
        for (i, &(length, symbol)) in order.iter().enumerate() {
            if i > 0 {
                next = (next + 1) << (length - prev_length);
            }
            prev_length = length;
            codes[symbol as usize] = Some(Code { bits: next, length });
        }

        Ok(Self { codes })
    }

    pub fn get(&self, symbol: Symbol) -> Option<Code> {
        self.codes.get(symbol as usize).copied().flatten()
    }

    /// Code length per symbol (0 = absent), the form stored in headers.
    pub fn lengths(&self) -> [u8; ALPHABET_SIZE] {
        let mut lengths = [0u8; ALPHABET_SIZE];
        for (symbol, code) in self.iter() {
            lengths[symbol as usize] = code.length;
        }
        lengths
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|c| (symbol as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.iter().map(|(_, code)| code).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Total payload bits for `freqs` under this table.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .present_symbols()
            .map(|(symbol, count)| {
                self.get(symbol).map_or(0, |code| code.length as u64 * count)
            })
            .sum()
    }
}

/// Build the tree for `freqs` and derive its canonical code table.
pub fn build_code_table(freqs: &FrequencyTable) -> Result<(HuffmanTree, CodeTable)> {
    let tree = HuffmanTree::build(freqs)?;
    let table = CodeTable::from_tree(&tree)?;
    trace!(
        symbols = table.len(),
        eos_length = table.get(END_OF_STREAM).map_or(0, |c| c.length),
        "canonical code table derived"
    );
    Ok((tree, table))
}

fn invalid_lengths(reason: impl Into<String>) -> crate::error::Error {
    HuffmanError::InvalidCodeLengths {
        reason: reason.into(),
    }
    .into()
}

/// Where one bit leads from a branch of the decoding tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// No code continues this way
    Empty,
    Branch(u32),
    Leaf(Symbol),
}

/// Binary trie rebuilt from a `CodeTable` for bit-by-bit decoding.
///
/// Branch 0 is the root. Each branch holds its `[zero, one]` links.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    branches: Vec<[Link; 2]>,
}

impl DecodeTree {
    pub const ROOT: u32 = 0;

    pub fn from_table(table: &CodeTable) -> Result<Self> {
        let mut branches = vec![[Link::Empty; 2]];

        for (symbol, code) in table.iter() {
            let mut at = Self::ROOT as usize;
            for depth in (0..code.length).rev() {
                let bit = ((code.bits >> depth) & 1) as usize;
                let last = depth == 0;
                match (branches[at][bit], last) {
                    (Link::Empty, true) => branches[at][bit] = Link::Leaf(symbol),
                    (Link::Empty, false) => {
                        let next = branches.len();
                        branches.push([Link::Empty; 2]);
                        branches[at][bit] = Link::Branch(next as u32);
                        at = next;
                    }
                    (Link::Branch(next), false) => at = next as usize,
                    _ => {
                        return Err(invalid_lengths(format!(
                            "code for symbol {symbol} collides with another code"
                        )))
                    }
                }
            }
        }

        Ok(Self { branches })
    }

    /// Follow one bit from `branch`.
    #[inline]
    pub fn step(&self, branch: u32, bit: bool) -> Link {
        self.branches[branch as usize][bit as usize]
    }
}
