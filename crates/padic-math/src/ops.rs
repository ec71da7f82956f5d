//! Composite nodes: sum, product and negation of two lazily evaluated
//! numbers, plus the free functions that build them.

use crate::error::{ensure_compatible, Result};
use crate::integer::{biguint_to_digits, digits_to_biguint};
use crate::number::{Node, PAdic};
use crate::valuation::{valuation_of_product, valuation_of_sum, Valuation};
use crate::Digit;
use num_integer::Integer;
use std::cell::{Cell, OnceCell, RefCell};
use tracing::{debug, warn};

struct SumState {
    valuation: Valuation,
    /// Power of the first cached digit.
    origin: i64,
    digits: Vec<Digit>,
    carry: Digit,
}

/// Digits of `left + right`, carried in order from the lower valuation.
pub(crate) struct SumNode {
    left: PAdic,
    right: PAdic,
    base: u32,
    max_digits: usize,
    state: RefCell<Option<SumState>>,
}

impl SumNode {
    fn new(left: PAdic, right: PAdic, max_digits: usize) -> Self {
        let base = left.base();
        Self {
            left,
            right,
            base,
            max_digits,
            state: RefCell::new(None),
        }
    }

    /// One carry step at `power`.
    fn step(&self, state: &mut SumState, power: i64) -> Digit {
        let raw = self.left.digit_at(power) + self.right.digit_at(power) + state.carry;
        let (carry, digit) = raw.div_mod_floor(&(self.base as Digit));
        state.carry = carry;
        digit
    }

    /// Walk from the lower operand valuation until a nonzero digit shows up
    /// or the lookahead cap is reached.
    fn scan(&self) -> SumState {
        let start = match valuation_of_sum(&self.left.valuation(), &self.right.valuation()) {
            Valuation::Finite(v) => v,
            Valuation::Infinite => {
                return SumState {
                    valuation: Valuation::infinite(),
                    origin: 0,
                    digits: Vec::new(),
                    carry: 0,
                }
            }
        };
        let mut state = SumState {
            valuation: Valuation::infinite(),
            origin: start,
            digits: Vec::new(),
            carry: 0,
        };
        for offset in 0..self.max_digits as i64 {
            let digit = self.step(&mut state, start + offset);
            state.digits.push(digit);
            if digit != 0 {
                state.valuation = Valuation::new(start + offset);
                return state;
            }
        }
        warn!(
            start,
            max_digits = self.max_digits,
            "Sum has no nonzero digit within lookahead; treating it as zero"
        );
        state
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SumState) -> R) -> R {
        let mut slot = self.state.borrow_mut();
        let state = slot.get_or_insert_with(|| self.scan());
        f(state)
    }

    pub(crate) fn valuation(&self) -> Valuation {
        self.with_state(|state| state.valuation)
    }

    pub(crate) fn coefficient(&self, power: i64) -> Digit {
        self.with_state(|state| {
            if state.valuation.is_infinite() || power < state.origin {
                return 0;
            }
            let index = (power - state.origin) as usize;
            while state.digits.len() <= index {
                let next = state.origin + state.digits.len() as i64;
                let digit = self.step(state, next);
                state.digits.push(digit);
            }
            state.digits[index]
        })
    }
}

struct ProductState {
    valuation: Valuation,
    /// Power of `digits[0]`.
    origin: i64,
    /// Coefficients at or above this power are outside the window.
    ceiling: i64,
    digits: Vec<Digit>,
}

/// Digits of `left * right` from one exact multiplication of truncated
/// windows.
///
/// Both operands are read from `min(v_left, v_right, 0)` for `max_digits`
/// places beyond power 0 and multiplied as integers. Coefficients below the
/// ceiling `min_power + max_digits` are exact; anything above reads as 0.
pub(crate) struct ProductNode {
    left: PAdic,
    right: PAdic,
    base: u32,
    max_digits: usize,
    state: OnceCell<ProductState>,
    warned: Cell<bool>,
}

impl ProductNode {
    fn new(left: PAdic, right: PAdic, max_digits: usize) -> Self {
        let base = left.base();
        Self {
            left,
            right,
            base,
            max_digits,
            state: OnceCell::new(),
            warned: Cell::new(false),
        }
    }

    fn window(&self, number: &PAdic, min_power: i64, size: usize) -> Vec<Digit> {
        (0..size as i64).map(|i| number.digit_at(min_power + i)).collect()
    }

    fn multiply(&self) -> ProductState {
        let (vl, vr) = (self.left.valuation(), self.right.valuation());
        let expected = valuation_of_product(&vl, &vr);
        let min_power = match (vl, vr, expected) {
            (Valuation::Finite(a), Valuation::Finite(b), Valuation::Finite(_)) => a.min(b).min(0),
            _ => {
                return ProductState {
                    valuation: Valuation::infinite(),
                    origin: 0,
                    ceiling: i64::MAX,
                    digits: Vec::new(),
                }
            }
        };
        let size = (self.max_digits as i64 - min_power) as usize;
        let left = digits_to_biguint(&self.window(&self.left, min_power, size), self.base);
        let right = digits_to_biguint(&self.window(&self.right, min_power, size), self.base);
        let mut digits = biguint_to_digits(&(left * right), self.base);
        digits.truncate(size);

        let origin = 2 * min_power;
        let ceiling = min_power + self.max_digits as i64;
        let valuation = match digits.iter().position(|d| *d != 0) {
            Some(pos) => {
                let valuation = Valuation::new(origin + pos as i64);
                if valuation != expected {
                    // zero divisors of a composite base
                    debug!(%expected, actual = %valuation, "Product valuation exceeds v(left) + v(right)");
                }
                valuation
            }
            None => {
                warn!(
                    left = %vl,
                    right = %vr,
                    max_digits = self.max_digits,
                    "Product vanishes within its precision window; treating it as zero"
                );
                Valuation::infinite()
            }
        };
        ProductState {
            valuation,
            origin,
            ceiling,
            digits,
        }
    }

    fn state(&self) -> &ProductState {
        self.state.get_or_init(|| self.multiply())
    }

    pub(crate) fn valuation(&self) -> Valuation {
        self.state().valuation
    }

    pub(crate) fn coefficient(&self, power: i64) -> Digit {
        let state = self.state();
        if state.valuation.is_infinite() || power < state.origin {
            return 0;
        }
        if power >= state.ceiling {
            if !self.warned.replace(true) {
                warn!(
                    power,
                    ceiling = state.ceiling,
                    "Product digit requested beyond its precision ceiling; reading 0"
                );
            }
            return 0;
        }
        state
            .digits
            .get((power - state.origin) as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// Closed-form additive inverse: the valuation digit `d` becomes
/// `base - d`, every higher digit `d` becomes `base - 1 - d`.
pub(crate) struct NegationNode {
    operand: PAdic,
    base: u32,
}

impl NegationNode {
    pub(crate) fn valuation(&self) -> Valuation {
        self.operand.valuation()
    }

    pub(crate) fn coefficient(&self, power: i64) -> Digit {
        let base = self.base as Digit;
        match self.operand.valuation() {
            Valuation::Infinite => 0,
            Valuation::Finite(v) if power < v => 0,
            Valuation::Finite(v) if power == v => base - self.operand.digit_at(power),
            Valuation::Finite(_) => base - 1 - self.operand.digit_at(power),
        }
    }
}

/// `a + b`. A zero operand short-circuits to the other operand.
pub fn sum(a: &PAdic, b: &PAdic) -> Result<PAdic> {
    ensure_compatible(a.base(), b.base())?;
    if a.valuation().is_infinite() {
        return Ok(b.clone());
    }
    if b.valuation().is_infinite() {
        return Ok(a.clone());
    }
    let max_digits = a.max_digits().max(b.max_digits());
    let node = SumNode::new(a.clone(), b.clone(), max_digits);
    Ok(PAdic::from_node(a.base(), max_digits, Node::Sum(node)))
}

/// `a * b`, exact below the product's precision ceiling.
pub fn product(a: &PAdic, b: &PAdic) -> Result<PAdic> {
    ensure_compatible(a.base(), b.base())?;
    let max_digits = a.max_digits().max(b.max_digits());
    let node = ProductNode::new(a.clone(), b.clone(), max_digits);
    Ok(PAdic::from_node(a.base(), max_digits, Node::Product(node)))
}

pub fn negate(a: &PAdic) -> PAdic {
    let node = NegationNode {
        operand: a.clone(),
        base: a.base(),
    };
    PAdic::from_node(a.base(), a.max_digits(), Node::Negation(node))
}

/// `a - b`, as `a + (-b)`.
pub fn difference(a: &PAdic, b: &PAdic) -> Result<PAdic> {
    ensure_compatible(a.base(), b.base())?;
    sum(a, &negate(b))
}

impl std::ops::Neg for &PAdic {
    type Output = PAdic;

    fn neg(self) -> PAdic {
        negate(self)
    }
}

impl std::ops::Neg for PAdic {
    type Output = PAdic;

    fn neg(self) -> PAdic {
        negate(&self)
    }
}
