//! Digit-by-digit equation solving.
//!
//! A formula `f` is solved by growing candidate digit prefixes one place at
//! a time, keeping every prefix `x` for which `f(x)` vanishes modulo
//! `base^len`. Each surviving prefix is the start of a p-adic solution as
//! long as the formula is continuous in the p-adic metric.

use crate::config::{EngineConfig, SolverConfig};
use crate::error::{ensure_base, ensure_compatible, MathError, Result};
use crate::number::PAdic;
use crate::ops::{difference, product};
use crate::Digit;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

pub type Formula = dyn Fn(&PAdic) -> Result<PAdic>;

/// Every word of `len` digits in `[0, base)`, lexicographic with the first
/// digit varying slowest.
pub fn enumerate_words(len: usize, base: u32) -> impl Iterator<Item = Vec<Digit>> {
    let base = base as u64;
    let total = base.saturating_pow(len as u32);
    (0..total).map(move |mut index| {
        let mut word = vec![0; len];
        for slot in word.iter_mut().rev() {
            *slot = (index % base) as Digit;
            index /= base;
        }
        word
    })
}

/// Does `formula(known ++ word)` vanish through the places `known` and
/// `word` cover?
fn extension_vanishes(
    base: u32,
    formula: &Formula,
    engine: &EngineConfig,
    known: &[Digit],
    word: &[Digit],
) -> Result<bool> {
    let guess: Vec<Digit> = known.iter().chain(word).copied().collect();
    let candidate = PAdic::from_digits_with_config(base, &guess, engine)?;
    let value = formula(&candidate)?;
    let vanishes = value.is_zero_to(guess.len());
    trace!(?guess, vanishes, "Checked candidate digits");
    Ok(vanishes)
}

/// Breadth-first solver: tracks every digit prefix still consistent with
/// the formula.
pub struct Solver {
    base: u32,
    formula: Box<Formula>,
    config: SolverConfig,
    engine: EngineConfig,
    live: Vec<Vec<Digit>>,
    digits_computed: usize,
}

impl Solver {
    pub fn new<F>(base: u32, formula: F) -> Result<Self>
    where
        F: Fn(&PAdic) -> Result<PAdic> + 'static,
    {
        Self::with_config(base, formula, SolverConfig::default(), EngineConfig::default())
    }

    pub fn with_config<F>(base: u32, formula: F, config: SolverConfig, engine: EngineConfig) -> Result<Self>
    where
        F: Fn(&PAdic) -> Result<PAdic> + 'static,
    {
        Ok(Self {
            base: ensure_base(base as i64)?,
            formula: Box::new(formula),
            config: SolverConfig {
                arity: config.arity.max(1),
            },
            engine,
            live: vec![Vec::new()],
            digits_computed: 0,
        })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn digits_computed(&self) -> usize {
        self.digits_computed
    }

    /// Extend the search until every live prefix has `n` digits. Asking for
    /// fewer digits than already computed does nothing.
    pub fn compute_digits(&mut self, n: usize) -> Result<()> {
        while self.digits_computed < n {
            self.live = self.extend_live()?;
            self.digits_computed += 1;
            debug!(
                depth = self.digits_computed,
                live = self.live.len(),
                "Solver advanced one digit"
            );
        }
        Ok(())
    }

    /// Surviving prefixes, lexicographically ordered, each
    /// `digits_computed()` long and least-significant digit first. Empty once
    /// no prefix survives.
    pub fn possible_solutions(&self) -> &[Vec<Digit>] {
        &self.live
    }

    fn extend_live(&self) -> Result<Vec<Vec<Digit>>> {
        let mut next = Vec::new();
        for known in &self.live {
            let mut accepted = BTreeSet::new();
            for word in enumerate_words(self.config.arity, self.base) {
                if accepted.contains(&word[0]) {
                    continue;
                }
                if extension_vanishes(self.base, self.formula.as_ref(), &self.engine, known, &word)? {
                    accepted.insert(word[0]);
                }
            }
            for digit in accepted {
                let mut prefix = known.clone();
                prefix.push(digit);
                next.push(prefix);
            }
        }
        Ok(next)
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("base", &self.base)
            .field("arity", &self.config.arity)
            .field("digits_computed", &self.digits_computed)
            .field("live", &self.live)
            .finish()
    }
}

/// Depth-first variant that commits to the smallest passing digit at each
/// place and never backtracks.
pub struct SinglePathSolver {
    base: u32,
    formula: Box<Formula>,
    config: SolverConfig,
    engine: EngineConfig,
    digits: Vec<Digit>,
}

impl SinglePathSolver {
    pub fn new<F>(base: u32, formula: F) -> Result<Self>
    where
        F: Fn(&PAdic) -> Result<PAdic> + 'static,
    {
        Self::with_config(base, formula, SolverConfig::default(), EngineConfig::default())
    }

    pub fn with_config<F>(base: u32, formula: F, config: SolverConfig, engine: EngineConfig) -> Result<Self>
    where
        F: Fn(&PAdic) -> Result<PAdic> + 'static,
    {
        Ok(Self {
            base: ensure_base(base as i64)?,
            formula: Box::new(formula),
            config: SolverConfig {
                arity: config.arity.max(1),
            },
            engine,
            digits: Vec::new(),
        })
    }

    /// Fails with [`MathError::NoSolution`] at the first place where no digit
    /// works. Digits found before the dead end are kept.
    pub fn compute_digits(&mut self, n: usize) -> Result<()> {
        while self.digits.len() < n {
            let next = self.next_digit()?;
            self.digits.push(next);
            debug!(depth = self.digits.len(), digit = next, "Solver committed digit");
        }
        Ok(())
    }

    fn next_digit(&self) -> Result<Digit> {
        for word in enumerate_words(self.config.arity, self.base) {
            if extension_vanishes(self.base, self.formula.as_ref(), &self.engine, &self.digits, &word)? {
                return Ok(word[0]);
            }
        }
        Err(MathError::NoSolution {
            digits: self.digits.clone(),
        })
    }

    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    pub fn to_padic(&self) -> Result<PAdic> {
        PAdic::from_digits_with_config(self.base, &self.digits, &self.engine)
    }
}

impl fmt::Debug for SinglePathSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinglePathSolver")
            .field("base", &self.base)
            .field("digits", &self.digits)
            .finish()
    }
}

pub fn solve<F>(base: u32, formula: F) -> Result<Solver>
where
    F: Fn(&PAdic) -> Result<PAdic> + 'static,
{
    Solver::new(base, formula)
}

/// Solver for `a * x = b`.
pub fn solve_linear(a: &PAdic, b: &PAdic) -> Result<Solver> {
    ensure_compatible(a.base(), b.base())?;
    let (a, b) = (a.clone(), b.clone());
    Solver::new(a.base(), move |x| difference(&product(&a, x)?, &b))
}

/// Solver for `x * x = a`.
pub fn solve_square(a: &PAdic) -> Result<Solver> {
    let a = a.clone();
    Solver::new(a.base(), move |x| difference(&product(x, x)?, &a))
}
