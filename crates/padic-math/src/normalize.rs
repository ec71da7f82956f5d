use crate::error::{ensure_base, Result};
use crate::source::DigitSource;
use crate::Digit;
use num_integer::Integer;
use std::cell::RefCell;
use std::fmt;

#[derive(Debug, Default)]
struct CarryState {
    digits: Vec<Digit>,
    // Wide enough that `raw + carry` never overflows for any `i64` input.
    carry: i128,
}

/// Turns a raw coefficient stream into proper base-`b` digits by floored
/// carry propagation: `digit = (raw + carry) mod b`,
/// `carry = floor((raw + carry) / b)`.
///
/// Digits are produced strictly in order and memoized; asking for position
/// `n` forces every position below it. Single-threaded: the cache lives in a
/// `RefCell`.
pub struct Normalizer<S> {
    base: u32,
    source: S,
    state: RefCell<CarryState>,
}

impl<S: DigitSource> Normalizer<S> {
    pub fn new(base: u32, source: S) -> Result<Self> {
        let base = ensure_base(base as i64)?;
        Ok(Self {
            base,
            source,
            state: RefCell::new(CarryState::default()),
        })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of digits produced so far.
    pub fn computed(&self) -> usize {
        self.state.borrow().digits.len()
    }

    /// Force every digit below `len`.
    fn fill(&self, len: usize) {
        let mut state = self.state.borrow_mut();
        let base = self.base as i128;
        while state.digits.len() < len {
            let pos = state.digits.len();
            let raw = self.source.at(pos) as i128 + state.carry;
            let (carry, digit) = raw.div_mod_floor(&base);
            state.carry = carry;
            state.digits.push(digit as Digit);
        }
    }

    /// True when every digit at or beyond `pos` is provably zero.
    ///
    /// Only sources with a known support can answer yes; unbounded sources
    /// always answer no.
    pub fn is_zero_from(&self, pos: usize) -> bool {
        match self.support() {
            Some(end) => end <= pos || {
                let state = self.state.borrow();
                state.digits[pos..end].iter().all(|d| *d == 0)
            },
            None => false,
        }
    }
}

impl<S: DigitSource> DigitSource for Normalizer<S> {
    fn at(&self, pos: usize) -> Digit {
        self.fill(pos + 1);
        self.state.borrow().digits[pos]
    }

    /// Once the raw source runs out, the remaining digits are driven by the
    /// carry alone. A positive carry dies out after finitely many digits; a
    /// negative one never does (it is a run of `base - 1` forever).
    fn support(&self) -> Option<usize> {
        let end = self.source.support()?;
        self.fill(end);
        loop {
            let len = {
                let state = self.state.borrow();
                if state.carry == 0 {
                    return Some(state.digits.len());
                }
                if state.carry < 0 {
                    return None;
                }
                state.digits.len()
            };
            self.fill(len + 1);
        }
    }
}

impl<S> fmt::Debug for Normalizer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        write!(
            f,
            "Normalizer(base={}, digits={:?}, carry={})",
            self.base, state.digits, state.carry
        )
    }
}
