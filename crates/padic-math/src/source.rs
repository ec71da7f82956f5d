//! Raw digit sources.
//!
//! A [`DigitSource`] answers "what is the coefficient at position `i`" for
//! every non-negative `i`. Raw sources may hand out values outside
//! `[0, base)` (negative digits after scaling, un-carried convolution sums);
//! only a [`Normalizer`](crate::normalize::Normalizer) guarantees digits.
//! Combining sources saturate at the `i64` range instead of overflowing.
//! Every source is padded with zeros past the data it defines.

use crate::number::PAdic;
use crate::Digit;
use std::cell::RefCell;

pub trait DigitSource {
    /// Coefficient at `pos`. Repeated queries must return the same value.
    fn at(&self, pos: usize) -> Digit;

    /// A position from which every coefficient is known to be zero, if the
    /// source can prove one exists.
    fn support(&self) -> Option<usize> {
        None
    }

    /// Coefficients at positions `0..len`.
    fn initial_digits(&self, len: usize) -> Vec<Digit> {
        (0..len).map(|pos| self.at(pos)).collect()
    }
}

impl<S: DigitSource + ?Sized> DigitSource for Box<S> {
    fn at(&self, pos: usize) -> Digit {
        (**self).at(pos)
    }

    fn support(&self) -> Option<usize> {
        (**self).support()
    }
}

impl<S: DigitSource + ?Sized> DigitSource for &S {
    fn at(&self, pos: usize) -> Digit {
        (**self).at(pos)
    }

    fn support(&self) -> Option<usize> {
        (**self).support()
    }
}

/// Finite digit array, least-significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralSource {
    digits: Vec<Digit>,
}

impl LiteralSource {
    pub fn new(digits: Vec<Digit>) -> Self {
        Self { digits }
    }

    pub fn as_slice(&self) -> &[Digit] {
        &self.digits
    }
}

impl DigitSource for LiteralSource {
    fn at(&self, pos: usize) -> Digit {
        self.digits.get(pos).copied().unwrap_or(0)
    }

    fn support(&self) -> Option<usize> {
        Some(self.digits.len())
    }
}

/// `view.at(i) = source.at(i - shift)`, zero where `i - shift < 0`.
#[derive(Debug, Clone)]
pub struct ShiftedSource<S> {
    source: S,
    shift: i64,
}

impl<S: DigitSource> ShiftedSource<S> {
    pub fn new(source: S, shift: i64) -> Self {
        Self { source, shift }
    }

    pub fn shift(&self) -> i64 {
        self.shift
    }
}

impl<S: DigitSource> DigitSource for ShiftedSource<S> {
    fn at(&self, pos: usize) -> Digit {
        let inner = pos as i64 - self.shift;
        if inner < 0 {
            return 0;
        }
        self.source.at(inner as usize)
    }

    fn support(&self) -> Option<usize> {
        let support = self.source.support()? as i64 + self.shift;
        Some(support.max(0) as usize)
    }
}

/// Every raw coefficient multiplied by a constant. A factor of `-1` turns a
/// magnitude into its additive inverse once normalized.
#[derive(Debug, Clone)]
pub struct ScaledSource<S> {
    source: S,
    factor: Digit,
}

impl<S: DigitSource> ScaledSource<S> {
    pub fn new(source: S, factor: Digit) -> Self {
        Self { source, factor }
    }
}

impl<S: DigitSource> DigitSource for ScaledSource<S> {
    fn at(&self, pos: usize) -> Digit {
        self.factor.saturating_mul(self.source.at(pos))
    }

    fn support(&self) -> Option<usize> {
        if self.factor == 0 {
            return Some(0);
        }
        self.source.support()
    }
}

/// Position-wise sum without carrying.
#[derive(Debug, Clone)]
pub struct PointwiseSum<L, R> {
    left: L,
    right: R,
}

impl<L: DigitSource, R: DigitSource> PointwiseSum<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: DigitSource, R: DigitSource> DigitSource for PointwiseSum<L, R> {
    fn at(&self, pos: usize) -> Digit {
        self.left.at(pos).saturating_add(self.right.at(pos))
    }

    fn support(&self) -> Option<usize> {
        Some(self.left.support()?.max(self.right.support()?))
    }
}

/// Cauchy product without carrying: `at(n) = sum(left[i] * right[n - i])`.
///
/// Coefficients grow with `n`; the caller is expected to normalize long
/// before they leave `i64`.
#[derive(Debug)]
pub struct Convolution<L, R> {
    left: L,
    right: R,
    cache: RefCell<Vec<Option<Digit>>>,
}

impl<L: DigitSource, R: DigitSource> Convolution<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            cache: RefCell::new(Vec::new()),
        }
    }
}

impl<L: DigitSource, R: DigitSource> DigitSource for Convolution<L, R> {
    fn at(&self, pos: usize) -> Digit {
        if let Some(Some(value)) = self.cache.borrow().get(pos) {
            return *value;
        }
        let value = (0..=pos)
            .map(|i| self.left.at(i).saturating_mul(self.right.at(pos - i)))
            .fold(0, Digit::saturating_add);
        let mut cache = self.cache.borrow_mut();
        if cache.len() <= pos {
            cache.resize(pos + 1, None);
        }
        cache[pos] = Some(value);
        value
    }

    fn support(&self) -> Option<usize> {
        let left = self.left.support()?;
        let right = self.right.support()?;
        if left == 0 || right == 0 {
            return Some(0);
        }
        Some(left + right - 1)
    }
}

/// Coefficients of a p-adic number read from a fixed origin power:
/// `at(i)` is the coefficient of `base^(origin + i)`.
#[derive(Debug, Clone)]
pub struct NumberSource {
    number: PAdic,
    origin: i64,
}

impl NumberSource {
    pub fn new(number: PAdic, origin: i64) -> Self {
        Self { number, origin }
    }
}

impl DigitSource for NumberSource {
    fn at(&self, pos: usize) -> Digit {
        self.number.digit_at(self.origin + pos as i64)
    }
}
