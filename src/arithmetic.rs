//! Arithmetic coding estimator
//!
//! The coder keeps a 62-bit integer interval and renormalizes it with the
//! usual E1/E2/E3 scalings, so every symbol costs constant work and the tag
//! is emitted as a bit string. The reported cost follows the ideal interval
//! instead: `-floor(log2(width))` bits are charged for every narrowing step,
//! with the width tracked as a normalized binary float.

use crate::error::CompressError;
use crate::stats::SymbolStatistics;
use crate::{Algorithm, EncodingResult, Representation};
use num_traits::Float;
use tracing::debug;

const CODE_BITS: u32 = 62;
const TOP_VALUE: u64 = (1 << CODE_BITS) - 1;
const FIRST_QUARTER: u64 = 1 << (CODE_BITS - 2);
const HALF: u64 = 2 * FIRST_QUARTER;
const THIRD_QUARTER: u64 = 3 * FIRST_QUARTER;

/// One symbol's slice of `[0, 1)`, in counts over the table total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolBounds {
    pub symbol: char,
    pub cumulative: u64,
    pub count: u64,
}

/// Cumulative probability table, symbols in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeTable {
    entries: Vec<SymbolBounds>,
    total: u64,
}

impl CumulativeTable {
    pub fn entries(&self) -> &[SymbolBounds] {
        &self.entries
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn get(&self, symbol: char) -> Option<&SymbolBounds> {
        self.entries
            .binary_search_by(|b| b.symbol.cmp(&symbol))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// `(symbol, lower, upper)` probability bounds.
    pub fn bounds(&self) -> Vec<(char, f64, f64)> {
        let total = self.total as f64;
        self.entries
            .iter()
            .map(|b| {
                (
                    b.symbol,
                    b.cumulative as f64 / total,
                    (b.cumulative + b.count) as f64 / total,
                )
            })
            .collect()
    }
}

pub fn calculate_probabilities(symbols: &[char]) -> Result<CumulativeTable, CompressError> {
    let stats = SymbolStatistics::from_symbols(symbols)?;
    let mut entries = Vec::with_capacity(stats.distinct());
    let mut cumulative = 0u64;
    for (&symbol, &count) in stats.frequencies() {
        entries.push(SymbolBounds {
            symbol,
            cumulative,
            count: count as u64,
        });
        cumulative += count as u64;
    }
    // every symbol needs a non-empty slice of the smallest renormalized range
    if cumulative > FIRST_QUARTER {
        return Err(CompressError::InputTooLarge {
            len: symbols.len(),
            max: FIRST_QUARTER as usize,
        });
    }
    Ok(CumulativeTable {
        entries,
        total: cumulative,
    })
}

/// Binary fraction `0.b1 b2 b3 ...`, trailing zeros dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    bits: Vec<bool>,
}

impl Tag {
    /// Parse the fraction digits after the binary point.
    pub fn from_bits(bits: &str) -> Result<Self, CompressError> {
        let bits = bits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CompressError::InvalidCodeword(format!(
                    "unexpected character {other:?} in tag"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::trimmed(bits))
    }

    /// Exact binary expansion of a float in `[0, 1)`.
    pub fn from_f64(value: f64) -> Result<Self, CompressError> {
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(CompressError::InvalidParameter(format!(
                "tag must lie in [0, 1), got {value}"
            )));
        }
        let (mantissa, exponent, _) = Float::integer_decode(value);
        if mantissa == 0 {
            return Ok(Self::default());
        }
        // value = mantissa / 2^len with mantissa < 2^len
        let len = exponent.unsigned_abs() as usize;
        let bits = (0..len)
            .rev()
            .map(|i| i < 64 && (mantissa >> i) & 1 == 1)
            .collect();
        Ok(Self::trimmed(bits))
    }

    fn trimmed(mut bits: Vec<bool>) -> Self {
        while bits.last() == Some(&false) {
            bits.pop();
        }
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    /// Nearest float, for display.
    pub fn to_f64(&self) -> f64 {
        let mut value = 0.0;
        let mut weight = 0.5;
        for &bit in &self.bits {
            if weight == 0.0 {
                break;
            }
            if bit {
                value += weight;
            }
            weight *= 0.5;
        }
        value
    }

    fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }
}

/// Ideal interval width `mantissa / 2^63 * 2^exponent`, mantissa kept in `[2^63, 2^64)`.
#[derive(Debug, Clone, Copy)]
struct Width {
    mantissa: u64,
    exponent: i64,
}

impl Width {
    fn unit() -> Self {
        Self {
            mantissa: 1 << 63,
            exponent: 0,
        }
    }

    fn floor_log2(&self) -> i64 {
        self.exponent
    }

    fn scale(&mut self, count: u64, total: u64) {
        let mut m = u128::from(self.mantissa) * u128::from(count) / u128::from(total);
        while m < 1 << 63 {
            m <<= 1;
            self.exponent -= 1;
        }
        self.mantissa = m as u64;
    }
}

/// Integer interval `[low, high]` shared by encoder and decoder.
#[derive(Debug, Clone, Copy)]
struct Interval {
    low: u64,
    high: u64,
}

#[derive(Debug, Clone, Copy)]
enum Scaling {
    Lower,
    Upper,
    Middle,
}

impl Interval {
    fn full() -> Self {
        Self {
            low: 0,
            high: TOP_VALUE,
        }
    }

    fn range(&self) -> u128 {
        u128::from(self.high - self.low) + 1
    }

    fn narrow(&mut self, bounds: &SymbolBounds, total: u64) {
        let range = self.range();
        let total = u128::from(total);
        let upper = u128::from(bounds.cumulative + bounds.count);
        self.high = self.low + (range * upper / total) as u64 - 1;
        self.low += (range * u128::from(bounds.cumulative) / total) as u64;
    }

    /// Next renormalization step, if the interval allows one.
    fn scaling(&self) -> Option<Scaling> {
        if self.high < HALF {
            Some(Scaling::Lower)
        } else if self.low >= HALF {
            Some(Scaling::Upper)
        } else if self.low >= FIRST_QUARTER && self.high < THIRD_QUARTER {
            Some(Scaling::Middle)
        } else {
            None
        }
    }

    /// Apply `scaling` and return the offset that was removed.
    fn rescale(&mut self, scaling: Scaling) -> u64 {
        let offset = match scaling {
            Scaling::Lower => 0,
            Scaling::Upper => HALF,
            Scaling::Middle => FIRST_QUARTER,
        };
        self.low = (self.low - offset) << 1;
        self.high = ((self.high - offset) << 1) | 1;
        offset
    }
}

/// Bit sink that resolves E3 follow bits.
#[derive(Debug, Default)]
struct CodeWriter {
    bits: Vec<bool>,
    pending: u64,
}

impl CodeWriter {
    fn write(&mut self, bit: bool) {
        self.bits.push(bit);
        for _ in 0..self.pending {
            self.bits.push(!bit);
        }
        self.pending = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticEncoding {
    pub tag: Tag,
    pub table: CumulativeTable,
    pub result: EncodingResult,
}

pub fn encode(symbols: &[char]) -> Result<ArithmeticEncoding, CompressError> {
    let stats = SymbolStatistics::from_symbols(symbols)?;
    let table = calculate_probabilities(symbols)?;

    let mut interval = Interval::full();
    let mut width = Width::unit();
    let mut writer = CodeWriter::default();
    let mut encoded_bits = 0u64;
    for (step, &c) in symbols.iter().enumerate() {
        let bounds = table
            .get(c)
            .ok_or(CompressError::SymbolNotFound { step })?;
        // width <= 1, so the floor is never positive
        encoded_bits += width.floor_log2().unsigned_abs();
        width.scale(bounds.count, table.total);

        interval.narrow(bounds, table.total);
        while let Some(scaling) = interval.scaling() {
            match scaling {
                Scaling::Lower => writer.write(false),
                Scaling::Upper => writer.write(true),
                Scaling::Middle => writer.pending += 1,
            }
            interval.rescale(scaling);
        }
    }

    // tag on the midpoint of the final interval
    let mid = interval.low + ((interval.high - interval.low + 1) >> 1);
    writer.write((mid >> (CODE_BITS - 1)) & 1 == 1);
    for i in (0..CODE_BITS - 1).rev() {
        writer.bits.push((mid >> i) & 1 == 1);
    }
    let tag = Tag::trimmed(writer.bits);

    let n = symbols.len();
    debug!(encoded_bits, tag_bits = tag.len(), "arithmetic estimate");

    let result = EncodingResult::new(
        Algorithm::Arithmetic,
        Representation::Tag(tag.to_f64()),
        n as u64 * 8,
        encoded_bits,
        encoded_bits as f64 / n as f64,
        stats.entropy(),
    )?;
    Ok(ArithmeticEncoding { tag, table, result })
}

/// Recover `length` symbols from `tag`.
///
/// The table's counts describe a message of `table.total()` symbols, so a
/// longer `length` is rejected.
pub fn decode(tag: &Tag, length: usize, table: &CumulativeTable) -> Result<String, CompressError> {
    if length as u64 > table.total {
        return Err(CompressError::InvalidParameter(format!(
            "cannot decode {length} symbols from a table of {}",
            table.total
        )));
    }

    let mut value = 0u64;
    let mut next = 0usize;
    for _ in 0..CODE_BITS {
        value = (value << 1) | u64::from(tag.bit(next));
        next += 1;
    }

    let mut interval = Interval::full();
    let mut output = String::new();
    for step in 0..length {
        let offset = value
            .checked_sub(interval.low)
            .ok_or(CompressError::SymbolNotFound { step })?;
        let target = ((u128::from(offset) + 1) * u128::from(table.total) - 1) / interval.range();
        let target = target as u64;
        let index = table
            .entries
            .partition_point(|b| b.cumulative + b.count <= target);
        let bounds = table
            .entries
            .get(index)
            .filter(|b| b.cumulative <= target)
            .ok_or(CompressError::SymbolNotFound { step })?;
        output.push(bounds.symbol);

        interval.narrow(bounds, table.total);
        while let Some(scaling) = interval.scaling() {
            let removed = interval.rescale(scaling);
            value = ((value - removed) << 1) | u64::from(tag.bit(next));
            next += 1;
        }
    }
    Ok(output)
}
