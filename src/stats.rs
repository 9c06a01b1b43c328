//! Symbol statistics: frequency and probability tables, Shannon entropy.

use crate::error::CompressError;
use crate::Input;
use std::collections::BTreeMap;

pub type FrequencyTable = BTreeMap<char, usize>;
pub type ProbabilityTable = BTreeMap<char, f64>;

/// Frequency table over one symbol sequence, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStatistics {
    frequencies: FrequencyTable,
    total: usize,
}

impl SymbolStatistics {
    pub fn from_symbols(symbols: &[char]) -> Result<Self, CompressError> {
        if symbols.is_empty() {
            return Err(CompressError::EmptyInput);
        }
        let mut frequencies = FrequencyTable::new();
        for &c in symbols {
            *frequencies.entry(c).or_insert(0) += 1;
        }
        Ok(Self {
            frequencies,
            total: symbols.len(),
        })
    }

    /// Integers are counted over their decimal digits.
    pub fn from_input(input: &Input) -> Result<Self, CompressError> {
        Self::from_symbols(&input.symbols())
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.frequencies.len()
    }

    pub fn probabilities(&self) -> ProbabilityTable {
        let total = self.total as f64;
        self.frequencies
            .iter()
            .map(|(&c, &count)| (c, count as f64 / total))
            .collect()
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total as f64;
        let mut entropy = 0.0;
        for &count in self.frequencies.values() {
            if count == self.total {
                // log2(1) is exactly zero
                continue;
            }
            let p = count as f64 / total;
            entropy -= p * p.log2();
        }
        entropy
    }
}

pub fn probabilities(input: &Input) -> Result<ProbabilityTable, CompressError> {
    Ok(SymbolStatistics::from_input(input)?.probabilities())
}

pub fn entropy(input: &Input) -> Result<f64, CompressError> {
    Ok(SymbolStatistics::from_input(input)?.entropy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let probs = probabilities(&Input::from("hello world")).unwrap();
        let sum: f64 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((probs[&'l'] - 3.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_symbol_entropy_is_zero() {
        assert_eq!(entropy(&Input::from("aaaa")).unwrap(), 0.0);
        assert_eq!(entropy(&Input::Integer(7)).unwrap(), 0.0);
    }

    #[test]
    fn test_uniform_entropy() {
        let h = entropy(&Input::from("abcd")).unwrap();
        assert!((h - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_integer_uses_decimal_digits() {
        let stats = SymbolStatistics::from_input(&Input::Integer(1121)).unwrap();
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.frequencies()[&'1'], 3);
        assert_eq!(stats.frequencies()[&'2'], 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            SymbolStatistics::from_symbols(&[]),
            Err(CompressError::EmptyInput)
        );
        assert!(entropy(&Input::from("")).is_err());
    }
}
