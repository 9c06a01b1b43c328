//! Golomb-Rice coding of a single non-negative integer.
//!
//! The quotient `value / m` is written in unary (ones closed by a zero) and
//! the remainder in binary. Two remainder codes are offered:
//!
//! - [`RemainderCode::Fixed`] (the default) always uses `floor(log2(m))`
//!   bits. For `m` not a power of two this is only an approximation of
//!   Golomb coding: large remainders overflow the field, get written at their
//!   natural width and no longer decode.
//! - [`RemainderCode::Minimal`] is the truncated binary code of true Golomb
//!   coding. It matches `Fixed` whenever `m` is a power of two and decodes
//!   for every `m`.

use crate::error::CompressError;
use crate::stats::SymbolStatistics;
use crate::{Algorithm, EncodingResult, Input, Representation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest unary run we are willing to spell out.
const MAX_QUOTIENT: u64 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderCode {
    #[default]
    Fixed,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GolombCoder {
    m: u64,
    remainder: RemainderCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GolombEncoding {
    pub quotient: u64,
    pub remainder: u64,
    pub codeword: String,
    pub result: EncodingResult,
}

impl GolombCoder {
    pub fn new(m: u64) -> Result<Self, CompressError> {
        Self::with_remainder(m, RemainderCode::default())
    }

    pub fn with_remainder(m: u64, remainder: RemainderCode) -> Result<Self, CompressError> {
        if m == 0 {
            return Err(CompressError::InvalidParameter(
                "golomb parameter m must be at least 1".into(),
            ));
        }
        Ok(Self { m, remainder })
    }

    pub fn m(&self) -> u64 {
        self.m
    }

    /// floor(log2(m))
    fn width(&self) -> usize {
        (u64::BITS - 1 - self.m.leading_zeros()) as usize
    }

    /// Remainders below this threshold take `width` bits under the
    /// truncated binary code, the rest take one more.
    fn threshold(&self) -> u128 {
        (1u128 << (self.width() + 1)) - u128::from(self.m)
    }

    fn remainder_bits(&self, r: u64) -> String {
        let k = self.width();
        match self.remainder {
            RemainderCode::Fixed if k == 0 => String::new(),
            RemainderCode::Fixed => format!("{r:0k$b}"),
            RemainderCode::Minimal => {
                let u = self.threshold();
                if u128::from(r) < u {
                    if k == 0 {
                        String::new()
                    } else {
                        format!("{r:0k$b}")
                    }
                } else {
                    let shifted = u128::from(r) + u;
                    let width = k + 1;
                    format!("{shifted:0width$b}")
                }
            }
        }
    }

    /// Unary quotient followed by the remainder code.
    pub fn codeword(&self, value: u64) -> Result<String, CompressError> {
        let quotient = value / self.m;
        if quotient > MAX_QUOTIENT {
            return Err(CompressError::InvalidParameter(format!(
                "quotient {quotient} is too long for a unary code, raise m"
            )));
        }
        let mut bits = "1".repeat(quotient as usize);
        bits.push('0');
        bits.push_str(&self.remainder_bits(value % self.m));
        Ok(bits)
    }

    pub fn encode(&self, value: u64) -> Result<GolombEncoding, CompressError> {
        let codeword = self.codeword(value)?;
        let digits: Vec<char> = value.to_string().chars().collect();
        let stats = SymbolStatistics::from_symbols(&digits)?;
        let encoded_bits = codeword.len() as u64;
        debug!(value, m = self.m, encoded_bits, "golomb-rice estimate");

        let result = EncodingResult::new(
            Algorithm::GolombRice,
            Representation::Text(codeword.clone()),
            digits.len() as u64 * 8,
            encoded_bits,
            encoded_bits as f64 / digits.len() as f64,
            stats.entropy(),
        )?;
        Ok(GolombEncoding {
            quotient: value / self.m,
            remainder: value % self.m,
            codeword,
            result,
        })
    }

    /// Accepts integers and digit strings only.
    pub fn encode_input(&self, input: &Input) -> Result<GolombEncoding, CompressError> {
        let value = match input {
            Input::Integer(v) => *v,
            Input::Text(s) if s.is_empty() => return Err(CompressError::EmptyInput),
            Input::Text(s) if s.chars().all(|c| c.is_ascii_digit()) => {
                s.parse().map_err(|_| CompressError::UnsupportedInput {
                    algorithm: Algorithm::GolombRice,
                    reason: "integer does not fit in 64 bits".into(),
                })?
            }
            Input::Text(_) => {
                return Err(CompressError::UnsupportedInput {
                    algorithm: Algorithm::GolombRice,
                    reason: "expected a non-negative integer".into(),
                })
            }
        };
        self.encode(value)
    }

    pub fn decode(&self, bits: &str) -> Result<u64, CompressError> {
        if let Some(bad) = bits.chars().find(|&c| c != '0' && c != '1') {
            return Err(CompressError::InvalidCodeword(format!(
                "unexpected character {bad:?}"
            )));
        }
        let bytes = bits.as_bytes();
        let quotient = bytes.iter().take_while(|&&b| b == b'1').count();
        if quotient == bytes.len() {
            return Err(CompressError::InvalidCodeword(
                "missing unary terminator".into(),
            ));
        }
        let mut pos = quotient + 1;

        let k = self.width();
        let mut read = |n: usize| -> Result<u128, CompressError> {
            let field = bits.get(pos..pos + n).ok_or_else(|| {
                CompressError::InvalidCodeword(format!("remainder needs {n} more bits"))
            })?;
            pos += n;
            if field.is_empty() {
                return Ok(0);
            }
            u128::from_str_radix(field, 2)
                .map_err(|e| CompressError::InvalidCodeword(e.to_string()))
        };

        let mut remainder = read(k)?;
        if self.remainder == RemainderCode::Minimal {
            let u = self.threshold();
            if remainder >= u {
                remainder = ((remainder << 1) | read(1)?) - u;
            }
        }
        if pos != bytes.len() {
            return Err(CompressError::InvalidCodeword(format!(
                "{} trailing bits",
                bytes.len() - pos
            )));
        }

        let value = u128::from(self.m) * quotient as u128 + remainder;
        u64::try_from(value)
            .map_err(|_| CompressError::InvalidCodeword("value overflows 64 bits".into()))
    }
}
