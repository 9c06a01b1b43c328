//! Error types for lossless-metrics

use crate::Algorithm;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
    #[error("empty input")]
    EmptyInput,

    #[error("{algorithm} does not accept this input: {reason}")]
    UnsupportedInput {
        algorithm: Algorithm,
        reason: String,
    },

    #[error("arithmetic decode: no symbol interval contains the value at step {step}")]
    SymbolNotFound { step: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("malformed codeword: {0}")]
    InvalidCodeword(String),

    #[error("{0} produced a zero-bit encoding, ratio and efficiency are undefined")]
    ZeroLengthEncoding(Algorithm),

    #[error("input of {len} symbols exceeds the configured maximum of {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CompressError {
    fn from(err: serde_json::Error) -> Self {
        CompressError::Serialization(err.to_string())
    }
}
