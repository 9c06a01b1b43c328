//! lossless-metrics: estimators for classical lossless coding schemes.
//!
//! Five codecs are run over one input and compared:
//! - Run-length coding of symbol runs
//! - Huffman prefix coding
//! - Arithmetic coding on a renormalized integer interval
//! - Golomb-Rice coding of a single integer
//! - LZW dictionary coding
//!
//! No codec packs a bitstream. Each yields a readable representation of its
//! codeword stream together with an analytic bit cost, from which the
//! compression ratio, average codeword length and efficiency against the
//! Shannon entropy are derived.

pub mod arithmetic;
pub mod config;
pub mod error;
pub mod golomb;
pub mod huffman;
pub mod lzw;
pub mod report;
pub mod run_length;
pub mod stats;

use crate::config::EstimatorConfig;
use crate::error::CompressError;
use crate::golomb::GolombCoder;
use crate::report::Report;
use crate::stats::SymbolStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    RunLength,
    Huffman,
    Arithmetic,
    GolombRice,
    Lzw,
}

impl Algorithm {
    /// Every algorithm, in the order the analyzer runs them.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::RunLength,
        Algorithm::Huffman,
        Algorithm::Arithmetic,
        Algorithm::GolombRice,
        Algorithm::Lzw,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::RunLength => "Run-Length Encoding",
            Algorithm::Huffman => "Huffman Encoding",
            Algorithm::Arithmetic => "Arithmetic Encoding",
            Algorithm::GolombRice => "Golomb-Rice Encoding",
            Algorithm::Lzw => "LZW Encoding",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw input: a character sequence or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Text(String),
    Integer(u64),
}

impl Input {
    /// Symbol sequence; integers contribute their decimal digits.
    pub fn symbols(&self) -> Vec<char> {
        match self {
            Input::Text(s) => s.chars().collect(),
            Input::Integer(v) => v.to_string().chars().collect(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Input::Integer(_) => true,
            Input::Text(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
        }
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Text(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Text(s)
    }
}

impl From<u64> for Input {
    fn from(v: u64) -> Self {
        Input::Integer(v)
    }
}

/// Readable form of a codeword stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Representation {
    /// Run pairs or a bit string.
    Text(String),
    /// Dictionary indices.
    Codes(Vec<u32>),
    /// Arithmetic tag.
    Tag(f64),
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Text(s) => f.write_str(s),
            Representation::Codes(codes) => write!(f, "{codes:?}"),
            Representation::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Per-algorithm outcome of one encode call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingResult {
    pub algorithm: Algorithm,
    pub compression_ratio: f64,
    pub original_bits: u64,
    pub representation: Representation,
    pub encoded_bits: u64,
    pub average_length: f64,
    pub efficiency_percent: f64,
}

impl EncodingResult {
    /// Derive ratio and efficiency. A zero bit cost or zero average length
    /// is reported as an error instead of being divided through.
    pub fn new(
        algorithm: Algorithm,
        representation: Representation,
        original_bits: u64,
        encoded_bits: u64,
        average_length: f64,
        entropy: f64,
    ) -> Result<Self, CompressError> {
        if encoded_bits == 0 || average_length <= 0.0 {
            return Err(CompressError::ZeroLengthEncoding(algorithm));
        }
        Ok(Self {
            algorithm,
            compression_ratio: original_bits as f64 / encoded_bits as f64,
            original_bits,
            representation,
            encoded_bits,
            average_length,
            efficiency_percent: entropy / average_length * 100.0,
        })
    }
}

/// Runs every estimator over one input
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EstimatorConfig,
}

impl Analyzer {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Encode with a single algorithm.
    pub fn encode(&self, input: &Input, algorithm: Algorithm) -> Result<EncodingResult, CompressError> {
        let symbols = input.symbols();
        if symbols.len() > self.config.max_input_len {
            return Err(CompressError::InputTooLarge {
                len: symbols.len(),
                max: self.config.max_input_len,
            });
        }

        let result = match algorithm {
            Algorithm::RunLength => run_length::encode(&symbols)?.result,
            Algorithm::Huffman => huffman::encode(&symbols)?.result,
            Algorithm::Arithmetic => arithmetic::encode(&symbols)?.result,
            Algorithm::GolombRice => {
                GolombCoder::with_remainder(self.config.golomb_m, self.config.golomb_remainder)?
                    .encode_input(input)?
                    .result
            }
            Algorithm::Lzw => lzw::encode(&symbols, self.config.lzw_cost)?.result,
        };
        Ok(result)
    }

    /// Run every algorithm. A failing codec is recorded in the report and
    /// never stops the others.
    pub fn analyze(&self, input: &Input) -> Report {
        let symbols = input.symbols();
        let statistics = if symbols.len() > self.config.max_input_len {
            Err(CompressError::InputTooLarge {
                len: symbols.len(),
                max: self.config.max_input_len,
            })
        } else {
            SymbolStatistics::from_symbols(&symbols)
        };
        if let Err(ref e) = statistics {
            warn!(error = %e, "symbol statistics unavailable");
        }

        let mut outcomes = Vec::with_capacity(Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            let outcome = self.encode(input, algorithm);
            match &outcome {
                Ok(result) => debug!(
                    %algorithm,
                    ratio = result.compression_ratio,
                    encoded_bits = result.encoded_bits,
                    "codec finished"
                ),
                Err(e) => warn!(%algorithm, error = %e, "codec failed"),
            }
            outcomes.push((algorithm, outcome));
        }

        Report::new(statistics, outcomes)
    }
}
