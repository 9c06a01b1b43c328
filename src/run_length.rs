//! Run-length estimation: collapses runs of identical symbols into
//! (symbol, count) pairs and projects a fixed-width cost per run.

use crate::error::CompressError;
use crate::stats::SymbolStatistics;
use crate::{Algorithm, EncodingResult, Representation};
use tracing::debug;

/// Bits reserved for the symbol of each run.
const SYMBOL_BITS: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub symbol: char,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLengthEncoding {
    pub runs: Vec<Run>,
    pub max_run: usize,
    pub result: EncodingResult,
}

/// Group maximal runs in one pass and cost each run as
/// `8 + ceil(log2(max_run + 1))` bits.
pub fn encode(symbols: &[char]) -> Result<RunLengthEncoding, CompressError> {
    let stats = SymbolStatistics::from_symbols(symbols)?;

    let mut runs: Vec<Run> = Vec::new();
    let mut max_run = 0;
    for &symbol in symbols {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.length += 1,
            _ => runs.push(Run { symbol, length: 1 }),
        }
        if let Some(run) = runs.last() {
            max_run = max_run.max(run.length);
        }
    }

    let mut text = String::new();
    for run in &runs {
        text.push(run.symbol);
        text.push_str(&run.length.to_string());
    }

    // ceil(log2(m + 1)) is the bit length of m
    let count_bits = u64::from(usize::BITS - max_run.leading_zeros());
    let encoded_bits = runs.len() as u64 * (SYMBOL_BITS + count_bits);
    let n = symbols.len();
    debug!(runs = runs.len(), max_run, encoded_bits, "run-length estimate");

    let result = EncodingResult::new(
        Algorithm::RunLength,
        Representation::Text(text),
        n as u64 * 8,
        encoded_bits,
        encoded_bits as f64 / n as f64,
        stats.entropy(),
    )?;
    Ok(RunLengthEncoding {
        runs,
        max_run,
        result,
    })
}

/// Expand a run list back into its text.
pub fn decode(runs: &[Run]) -> String {
    let mut output = String::with_capacity(runs.iter().map(|r| r.length).sum());
    for run in runs {
        output.extend(std::iter::repeat(run.symbol).take(run.length));
    }
    output
}
