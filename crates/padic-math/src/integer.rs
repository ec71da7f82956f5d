//! Exact-integer helpers: valuations, positional digits and truncated
//! negation over `BigInt`.

use crate::valuation::Valuation;
use crate::Digit;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

pub fn vp(n: i64, base: u32) -> Valuation {
    vp_bigint(&BigInt::from(n), base)
}

/// Largest `k` with `base^k | n`; `Infinite` for zero.
pub fn vp_bigint(n: &BigInt, base: u32) -> Valuation {
    if n.is_zero() {
        return Valuation::infinite();
    }

    let mut v = 0;
    let mut m = n.magnitude().clone();
    let base_big = BigUint::from(base);

    loop {
        let (quotient, remainder) = m.div_rem(&base_big);
        if !remainder.is_zero() {
            break;
        }
        v += 1;
        m = quotient;
    }

    Valuation::new(v)
}

/// Valuation of `|a - b|`.
pub fn int_distance(a: &BigInt, b: &BigInt, base: u32) -> Valuation {
    vp_bigint(&(a - b), base)
}

/// First `precision` p-adic digits of a signed integer. Negative values
/// expand into their infinite tail of `base - 1` digits.
pub fn expand_padic(n: &BigInt, base: u32, precision: usize) -> Vec<Digit> {
    let mut digits = Vec::with_capacity(precision);
    let mut value = n.clone();
    let base_big = BigInt::from(base);

    for _ in 0..precision {
        let (quotient, digit) = value.div_mod_floor(&base_big);
        digits.push(digit.to_i64().unwrap_or(0));
        value = quotient;
    }

    digits
}

/// `n` times the repunit of `base - 1` with `digits` places, i.e.
/// `(base^digits - 1) * n`, which agrees with `-n` in its lowest `digits`
/// places. `digits` is raised to one more than the length of `n` when
/// shorter.
pub fn approximate_negation(n: &BigUint, base: u32, digits: usize) -> BigUint {
    let width = biguint_to_digits(n, base).len() + 1;
    let digits = digits.max(width);
    let repunit = BigUint::from(base).pow(digits as u32) - BigUint::one();
    repunit * n
}

/// Digits least-significant first, evaluated as an integer. Digits are
/// expected in `[0, base)`.
pub fn digits_to_biguint(digits: &[Digit], base: u32) -> BigUint {
    let base_big = BigUint::from(base);
    digits.iter().rev().fold(BigUint::zero(), |acc, d| {
        acc * &base_big + BigUint::from(d.unsigned_abs())
    })
}

/// Signed variant of [`digits_to_biguint`]: raw coefficients of either sign,
/// no carrying required.
pub fn digits_to_bigint(digits: &[Digit], base: u32) -> BigInt {
    let base_big = BigInt::from(base);
    digits
        .iter()
        .rev()
        .fold(BigInt::zero(), |acc, d| acc * &base_big + BigInt::from(*d))
}

/// Positional digits of `n`, least-significant first. Zero has no digits.
pub fn biguint_to_digits(n: &BigUint, base: u32) -> Vec<Digit> {
    let base_big = BigUint::from(base);
    let mut digits = Vec::new();
    let mut value = n.clone();
    while !value.is_zero() {
        let (quotient, digit) = value.div_rem(&base_big);
        digits.push(digit.to_i64().unwrap_or(0));
        value = quotient;
    }
    digits
}

/// Sign and magnitude digits of `n`.
pub fn bigint_to_digits(n: &BigInt, base: u32) -> (Sign, Vec<Digit>) {
    (n.sign(), biguint_to_digits(n.magnitude(), base))
}
