//! Huffman coding estimator
//!
//! Builds a prefix-code tree from symbol frequencies, derives the codeword
//! table and costs the input exactly from the codeword lengths.

use crate::error::CompressError;
use crate::stats::SymbolStatistics;
use crate::{Algorithm, EncodingResult, Representation};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use tracing::debug;

pub type CodewordTable = BTreeMap<char, String>;

#[derive(Debug, Clone)]
struct HuffNode {
    freq: usize,
    // arrival order into the queue, breaks frequency ties
    order: usize,
    symbol: Option<char>,
    left: Option<Box<HuffNode>>,
    right: Option<Box<HuffNode>>,
}

impl Eq for HuffNode {}
impl PartialEq for HuffNode {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.order == other.order
    }
}
impl PartialOrd for HuffNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HuffNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (freq, order)
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Binary code tree; every symbol sits on a leaf.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Summed frequency of all leaves.
    pub fn weight(&self) -> usize {
        self.root.freq
    }

    pub fn is_leaf(&self) -> bool {
        self.root.symbol.is_some()
    }
}

/// Merge the two lowest-frequency nodes until one root remains. Leaves enter
/// the queue in the order given; a single entry yields a one-node tree.
pub fn build_tree(frequencies: &[(char, usize)]) -> Option<HuffmanTree> {
    let mut heap = BinaryHeap::new();
    let mut order = 0;
    for &(symbol, freq) in frequencies {
        heap.push(HuffNode {
            freq,
            order,
            symbol: Some(symbol),
            left: None,
            right: None,
        });
        order += 1;
    }

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        heap.push(HuffNode {
            freq: left.freq + right.freq,
            order,
            symbol: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        });
        order += 1;
    }

    heap.pop().map(|root| HuffmanTree { root })
}

fn build_codes(node: &HuffNode, prefix: String, codes: &mut CodewordTable) {
    if let Some(sym) = node.symbol {
        // a lone root still needs one bit per symbol
        let code = if prefix.is_empty() { "0".to_string() } else { prefix };
        codes.insert(sym, code);
        return;
    }
    if let Some(ref left) = node.left {
        build_codes(left, format!("{prefix}0"), codes);
    }
    if let Some(ref right) = node.right {
        build_codes(right, format!("{prefix}1"), codes);
    }
}

/// Depth-first walk: `0` for left edges, `1` for right edges.
pub fn build_codewords(tree: &HuffmanTree) -> CodewordTable {
    let mut codes = CodewordTable::new();
    build_codes(&tree.root, String::new(), &mut codes);
    codes
}

#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanEncoding {
    pub codewords: CodewordTable,
    pub result: EncodingResult,
}

/// Distinct symbols with their counts, in order of first appearance.
fn leaf_order(symbols: &[char], stats: &SymbolStatistics) -> Vec<(char, usize)> {
    let mut queued = HashSet::with_capacity(stats.distinct());
    symbols
        .iter()
        .filter(|&&c| queued.insert(c))
        .map(|&c| (c, stats.frequencies()[&c]))
        .collect()
}

/// Encode a symbol sequence. Purely numeric input is rejected.
pub fn encode(symbols: &[char]) -> Result<HuffmanEncoding, CompressError> {
    if !symbols.is_empty() && symbols.iter().all(char::is_ascii_digit) {
        return Err(CompressError::UnsupportedInput {
            algorithm: Algorithm::Huffman,
            reason: "expected a symbol string, got a number".into(),
        });
    }
    let stats = SymbolStatistics::from_symbols(symbols)?;

    let tree = build_tree(&leaf_order(symbols, &stats)).ok_or(CompressError::EmptyInput)?;
    let codewords = build_codewords(&tree);

    let mut bits = String::new();
    for c in symbols {
        if let Some(code) = codewords.get(c) {
            bits.push_str(code);
        }
    }

    let weighted: usize = stats
        .frequencies()
        .iter()
        .map(|(c, &freq)| codewords[c].len() * freq)
        .sum();
    let n = symbols.len();
    let encoded_bits = bits.len() as u64;
    debug!(distinct = codewords.len(), encoded_bits, "huffman estimate");

    let result = EncodingResult::new(
        Algorithm::Huffman,
        Representation::Text(bits),
        n as u64 * 8,
        encoded_bits,
        weighted as f64 / n as f64,
        stats.entropy(),
    )?;
    Ok(HuffmanEncoding { codewords, result })
}

/// Decode a bit string produced with `codewords`.
pub fn decode(bits: &str, codewords: &CodewordTable) -> Result<String, CompressError> {
    let code_to_symbol: HashMap<&str, char> =
        codewords.iter().map(|(&c, code)| (code.as_str(), c)).collect();
    let longest = codewords.values().map(String::len).max().unwrap_or(0);

    let mut output = String::new();
    let mut start = 0;
    for (end, bit) in bits.char_indices() {
        if bit != '0' && bit != '1' {
            return Err(CompressError::InvalidCodeword(format!(
                "unexpected character {bit:?} at offset {end}"
            )));
        }
        let current = &bits[start..=end];
        if let Some(&sym) = code_to_symbol.get(current) {
            output.push(sym);
            start = end + 1;
        } else if current.len() >= longest {
            return Err(CompressError::InvalidCodeword(format!(
                "no codeword matches {current}"
            )));
        }
    }
    if start < bits.len() {
        return Err(CompressError::InvalidCodeword(format!(
            "trailing bits {}",
            &bits[start..]
        )));
    }
    Ok(output)
}
