//! Lazy p-adic arithmetic.
//!
//! Numbers are infinite digit streams produced on demand: literals, sums,
//! products and negations compose into a graph of [`PAdic`] nodes, each
//! computing its own digits the first time they are asked for. The
//! [`solver`] module builds on this to find digit expansions of roots of
//! polynomial-like formulas one place at a time.

pub mod config;
pub mod distance;
pub mod error;
pub mod format;
pub mod integer;
pub mod literal;
pub mod normalize;
pub mod number;
pub mod ops;
pub mod solver;
pub mod source;
pub mod valuation;

/// A coefficient. Normalized digits lie in `[0, base)`; raw sources may
/// produce anything.
pub type Digit = i64;

/// Default lookahead for valuation searches and product windows.
pub const MAX_DIGITS: usize = 100;
pub const MAX_FRACTIONAL_DIGITS: usize = 10;
pub const DEFAULT_BASE: u32 = 10;
/// Integer digits shown by `Display` for [`PAdic`].
pub const DISPLAY_DIGITS: usize = 20;

pub use config::{EngineConfig, SolverConfig};
pub use distance::{agreement, norm, padic_distance};
pub use error::{MathError, Result};
pub use format::RenderOptions;
pub use literal::{Literal, Sign};
pub use normalize::Normalizer;
pub use number::PAdic;
pub use ops::{difference, negate, product, sum};
pub use solver::{enumerate_words, solve, solve_linear, solve_square, SinglePathSolver, Solver};
pub use source::DigitSource;
pub use valuation::Valuation;
