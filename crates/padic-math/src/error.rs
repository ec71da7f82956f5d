use crate::Digit;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Number base must be an integer that is at least 2, not {0}")]
    InvalidBase(i64),

    #[error("Base mismatch: expected {expected}, got {actual}")]
    BaseMismatch { expected: u32, actual: u32 },

    #[error("Invalid digit: {digit} is not a digit in base {base}")]
    InvalidDigit { digit: u32, base: u32 },

    #[error("Invalid character in literal: {0:?}")]
    InvalidCharacter(char),

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Normalizing negative digits is not supported: {0}")]
    NegativeDigit(Digit),

    #[error("Cannot build a p-adic number from non-finite value {0}")]
    NonFinite(f64),

    #[error("Can only render digits for bases between 2 and 36, not {0}")]
    UnsupportedRadix(u32),

    #[error("Could not find solution starting with digits {digits:?}")]
    NoSolution { digits: Vec<Digit> },
}

pub type Result<T> = std::result::Result<T, MathError>;

/// Reject bases that cannot carry a positional expansion.
pub fn ensure_base(base: i64) -> Result<u32> {
    if base < 2 || base > u32::MAX as i64 {
        return Err(MathError::InvalidBase(base));
    }
    Ok(base as u32)
}

/// Fail with `BaseMismatch` unless both operands share a base.
pub fn ensure_compatible(expected: u32, actual: u32) -> Result<()> {
    if expected != actual {
        return Err(MathError::BaseMismatch { expected, actual });
    }
    Ok(())
}
