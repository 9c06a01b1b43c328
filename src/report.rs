//! Aggregated outcome of one analyzer run.

use crate::error::CompressError;
use crate::stats::{ProbabilityTable, SymbolStatistics};
use crate::{Algorithm, EncodingResult};
use serde_json::json;
use std::fmt;

pub type Outcome = Result<EncodingResult, CompressError>;

#[derive(Debug, Clone)]
pub struct Report {
    statistics: Result<SymbolStatistics, CompressError>,
    outcomes: Vec<(Algorithm, Outcome)>,
}

impl Report {
    pub(crate) fn new(
        statistics: Result<SymbolStatistics, CompressError>,
        outcomes: Vec<(Algorithm, Outcome)>,
    ) -> Self {
        Self {
            statistics,
            outcomes,
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.statistics.as_ref().map(|s| s.total()).unwrap_or(0)
    }

    pub fn entropy(&self) -> Option<f64> {
        self.statistics.as_ref().ok().map(SymbolStatistics::entropy)
    }

    pub fn probabilities(&self) -> Option<ProbabilityTable> {
        self.statistics
            .as_ref()
            .ok()
            .map(SymbolStatistics::probabilities)
    }

    pub fn statistics_error(&self) -> Option<&CompressError> {
        self.statistics.as_ref().err()
    }

    pub fn outcomes(&self) -> &[(Algorithm, Outcome)] {
        &self.outcomes
    }

    fn outcome(&self, algorithm: Algorithm) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(a, _)| *a == algorithm)
            .map(|(_, outcome)| outcome)
    }

    pub fn result(&self, algorithm: Algorithm) -> Option<&EncodingResult> {
        self.outcome(algorithm).and_then(|o| o.as_ref().ok())
    }

    pub fn error(&self, algorithm: Algorithm) -> Option<&CompressError> {
        self.outcome(algorithm).and_then(|o| o.as_ref().err())
    }

    pub fn successes(&self) -> impl Iterator<Item = &EncodingResult> {
        self.outcomes.iter().filter_map(|(_, o)| o.as_ref().ok())
    }

    /// Every algorithm tied for the highest compression ratio.
    pub fn best(&self) -> Vec<Algorithm> {
        let max = self
            .successes()
            .map(|r| r.compression_ratio)
            .fold(f64::NEG_INFINITY, f64::max);
        self.successes()
            .filter(|r| r.compression_ratio == max)
            .map(|r| r.algorithm)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, CompressError> {
        let results: Vec<_> = self
            .outcomes
            .iter()
            .map(|(algorithm, outcome)| match outcome {
                Ok(result) => json!({ "algorithm": algorithm, "result": result }),
                Err(e) => json!({ "algorithm": algorithm, "error": e.to_string() }),
            })
            .collect();
        let value = json!({
            "symbol_count": self.symbol_count(),
            "entropy": self.entropy(),
            "probabilities": self.probabilities(),
            "statistics_error": self.statistics_error().map(|e| e.to_string()),
            "results": results,
            "best": self.best(),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.statistics {
            Ok(stats) => {
                writeln!(f, "Entropy: {:.2}", stats.entropy())?;
                writeln!(f, "Probabilities of occurrence for each symbol:")?;
                for (symbol, p) in stats.probabilities() {
                    writeln!(f, "{symbol:?}: {p:.4}")?;
                }
            }
            Err(e) => writeln!(f, "Statistics unavailable: {e}")?,
        }
        writeln!(f)?;

        for (algorithm, outcome) in &self.outcomes {
            writeln!(f, "{algorithm}:")?;
            match outcome {
                Ok(r) => {
                    writeln!(f, "Before: {} bits", r.original_bits)?;
                    writeln!(f, "Code: {}", r.representation)?;
                    writeln!(f, "After: {} bits", r.encoded_bits)?;
                    writeln!(f, "Average Length: {:.4}", r.average_length)?;
                    writeln!(f, "Compression Ratio: {:.2}", r.compression_ratio)?;
                    writeln!(f, "Efficiency: {:.2} %", r.efficiency_percent)?;
                }
                Err(e) => writeln!(f, "Error: {e}")?,
            }
            writeln!(f)?;
        }

        let best: Vec<&str> = self.best().iter().map(Algorithm::name).collect();
        write!(f, "Best Compression Algorithm(s): {}", best.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analyzer, Input};

    #[test]
    fn test_best_includes_ties() {
        // "ab": arithmetic costs 1 bit; nothing else gets close
        let report = Analyzer::default().analyze(&Input::from("ab"));
        assert_eq!(report.best(), vec![Algorithm::Arithmetic]);

        let tied = Report::new(
            Err(CompressError::EmptyInput),
            vec![
                (
                    Algorithm::RunLength,
                    EncodingResult::new(
                        Algorithm::RunLength,
                        crate::Representation::Text("a2".into()),
                        16,
                        8,
                        4.0,
                        0.0,
                    ),
                ),
                (
                    Algorithm::Lzw,
                    EncodingResult::new(
                        Algorithm::Lzw,
                        crate::Representation::Codes(vec![97, 128]),
                        32,
                        16,
                        4.0,
                        0.0,
                    ),
                ),
                (Algorithm::Huffman, Err(CompressError::EmptyInput)),
            ],
        );
        assert_eq!(tied.best(), vec![Algorithm::RunLength, Algorithm::Lzw]);
    }

    #[test]
    fn test_display_lists_every_codec() {
        let report = Analyzer::default().analyze(&Input::from("aaabbbccd"));
        let text = report.to_string();
        for algorithm in Algorithm::ALL {
            assert!(text.contains(algorithm.name()));
        }
        assert!(text.contains("Code: a3b3c2d1"));
        assert!(text.contains("Best Compression Algorithm(s): "));
    }

    #[test]
    fn test_json_export() {
        let report = Analyzer::default().analyze(&Input::from("aab"));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["symbol_count"], 3);
        assert_eq!(json["results"].as_array().unwrap().len(), 5);
        assert_eq!(json["results"][1]["algorithm"], "Huffman");
        assert_eq!(json["results"][1]["result"]["encoded_bits"], 3);
        assert!(json["results"][3]["error"].is_string());
        assert!(json["probabilities"]["a"].is_number());
    }

    #[test]
    fn test_empty_input_report() {
        let report = Analyzer::default().analyze(&Input::from(""));
        assert_eq!(report.statistics_error(), Some(&CompressError::EmptyInput));
        assert_eq!(report.successes().count(), 0);
        assert!(report.best().is_empty());
        assert!(report.to_string().contains("Statistics unavailable"));
    }
}
