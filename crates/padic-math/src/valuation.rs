use serde::{Deserialize, Serialize};
use std::fmt;

/// Exponent of the lowest nonzero coefficient, or `+Infinity` for zero.
///
/// `Finite` sorts before `Infinite`, so `min` over valuations behaves like
/// the extended integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Valuation {
    Finite(i64),
    Infinite,
}

impl Valuation {
    pub fn new(value: i64) -> Self {
        Valuation::Finite(value)
    }

    pub fn infinite() -> Self {
        Valuation::Infinite
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Valuation::Infinite)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Valuation::Finite(0))
    }

    pub fn finite_value(&self) -> Option<i64> {
        match self {
            Valuation::Finite(v) => Some(*v),
            Valuation::Infinite => None,
        }
    }

    /// `base^(-v)`, the p-adic absolute value this valuation induces.
    pub fn norm(&self, base: u32) -> f64 {
        match self {
            Valuation::Finite(v) => (base as f64).powf(-(*v as f64)),
            Valuation::Infinite => 0.0,
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valuation::Finite(v) => write!(f, "{}", v),
            Valuation::Infinite => write!(f, "Infinity"),
        }
    }
}

/// Lower bound on the valuation of a sum; equality holds when the two
/// valuations differ.
pub fn valuation_of_sum(val_a: &Valuation, val_b: &Valuation) -> Valuation {
    (*val_a).min(*val_b)
}

pub fn valuation_of_product(val_a: &Valuation, val_b: &Valuation) -> Valuation {
    match (val_a, val_b) {
        (Valuation::Finite(a), Valuation::Finite(b)) => Valuation::Finite(a + b),
        _ => Valuation::Infinite,
    }
}
