use crate::{MAX_DIGITS, MAX_FRACTIONAL_DIGITS};
use serde::{Deserialize, Serialize};

/// Precision knobs shared by every number built from one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lookahead cap for valuation scans and the product window width.
    pub max_digits: usize,
    /// Fractional digits kept when converting floats.
    pub max_fractional_digits: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_digits: MAX_DIGITS,
            max_fractional_digits: MAX_FRACTIONAL_DIGITS,
        }
    }
}

impl EngineConfig {
    pub fn with_max_digits(mut self, max_digits: usize) -> Self {
        self.max_digits = max_digits.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Digits of lookahead per step. `1` checks exactly the next digit.
    pub arity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { arity: 1 }
    }
}
