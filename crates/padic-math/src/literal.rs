//! Finite literals: a sign, a digit array and a radix point.
//!
//! Text grammar: optional whitespace and parentheses are ignored, then an
//! optional `-` and/or `+`, the digits (base-36 characters, at most one
//! `.`), and an optional `_<base>` suffix in decimal.

use crate::config::EngineConfig;
use crate::error::{ensure_base, ensure_compatible, MathError, Result};
use crate::format::digit_char;
use crate::integer::{bigint_to_digits, biguint_to_digits, digits_to_biguint};
use crate::number::PAdic;
use crate::source::{LiteralSource, ScaledSource};
use crate::valuation::Valuation;
use crate::{Digit, DEFAULT_BASE};
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn flip(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// `sign * sum(repr[i] * base^(i - radix))`.
///
/// `repr` is least-significant first with every digit in `[0, base)`; the
/// lowest `radix` entries sit right of the radix point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub repr: Vec<Digit>,
    pub radix: usize,
    pub base: u32,
    pub sign: Sign,
}

impl Literal {
    pub fn zero(base: u32) -> Result<Self> {
        Ok(Self {
            repr: Vec::new(),
            radix: 0,
            base: ensure_base(base as i64)?,
            sign: Sign::Positive,
        })
    }

    /// Parse a literal. A `_<base>` suffix wins over `base`; without either
    /// the base is 10.
    pub fn parse(text: &str, base: Option<u32>) -> Result<Self> {
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let mut body = unwrap_parens(&cleaned);
        let mut sign = Sign::Positive;
        if let Some(rest) = body.strip_prefix('-') {
            sign = Sign::Negative;
            body = rest;
        }
        if let Some(rest) = body.strip_prefix('+') {
            body = rest;
        }

        let body = unwrap_parens(body);

        let (body, suffix) = match body.split_once('_') {
            Some((front, back)) => (unwrap_parens(front), Some(back)),
            None => (body, None),
        };
        let base = match suffix {
            Some(suffix) => {
                let parsed = suffix
                    .parse::<i64>()
                    .map_err(|_| MathError::InvalidLiteral(format!("bad base suffix {:?}", suffix)))?;
                ensure_base(parsed)?
            }
            None => ensure_base(base.unwrap_or(DEFAULT_BASE) as i64)?,
        };

        let body = body.trim_start_matches('0');
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if frac_part.contains('.') {
            return Err(MathError::InvalidLiteral(format!(
                "more than one radix point in {:?}",
                text
            )));
        }
        let frac_part = frac_part.trim_end_matches('0');

        let repr = int_part
            .chars()
            .chain(frac_part.chars())
            .rev()
            .map(|c| {
                let digit = c.to_digit(36).ok_or(MathError::InvalidCharacter(c))?;
                if digit >= base {
                    return Err(MathError::InvalidDigit { digit, base });
                }
                Ok(digit as Digit)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            repr,
            radix: frac_part.len(),
            base,
            sign,
        }
        .trimmed())
    }

    pub fn from_integer(n: i64, base: u32) -> Result<Self> {
        Self::from_bigint(&BigInt::from(n), base)
    }

    pub fn from_bigint(n: &BigInt, base: u32) -> Result<Self> {
        let base = ensure_base(base as i64)?;
        let (sign, repr) = bigint_to_digits(n, base);
        Ok(Self {
            repr,
            radix: 0,
            base,
            sign: if sign == BigSign::Minus {
                Sign::Negative
            } else {
                Sign::Positive
            },
        })
    }

    /// Integer from a digit array, least-significant first. Digits at or
    /// above `base` are carried; negative digits are rejected.
    pub fn from_digits(digits: &[Digit], base: u32) -> Result<Self> {
        let base = ensure_base(base as i64)?;
        if let Some(negative) = digits.iter().find(|d| **d < 0) {
            return Err(MathError::NegativeDigit(*negative));
        }
        let value = digits_to_biguint(digits, base);
        Ok(Self {
            repr: biguint_to_digits(&value, base),
            radix: 0,
            base,
            sign: Sign::Positive,
        })
    }

    /// Integer-valued floats are exact; otherwise at most
    /// `max_fractional_digits` digits right of the radix point are kept.
    pub fn from_f64(x: f64, base: u32, max_fractional_digits: usize) -> Result<Self> {
        let base = ensure_base(base as i64)?;
        if !x.is_finite() {
            return Err(MathError::NonFinite(x));
        }
        let sign = if x < 0.0 { Sign::Negative } else { Sign::Positive };
        let magnitude = x.abs();

        let mut value = BigUint::from_f64(magnitude.trunc()).unwrap_or_default();
        let mut fraction = magnitude % 1.0;
        let mut radix = 0;
        while fraction != 0.0 && radix < max_fractional_digits {
            let shifted = fraction * base as f64;
            let digit = shifted.trunc();
            fraction = shifted % 1.0;
            value = value * base + BigUint::from_f64(digit).unwrap_or_default();
            radix += 1;
        }

        Ok(Self {
            repr: biguint_to_digits(&value, base),
            radix,
            base,
            sign,
        }
        .trimmed())
    }

    /// Exponent of the lowest nonzero digit. Fractional literals report
    /// `-radix`.
    pub fn valuation(&self) -> Valuation {
        if self.radix > 0 {
            return Valuation::new(-(self.radix as i64));
        }
        match self.repr.iter().position(|d| *d != 0) {
            Some(pos) => Valuation::new(pos as i64),
            None => Valuation::infinite(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.repr.iter().all(|d| *d == 0)
    }

    /// The digits read as an integer, ignoring the radix point.
    pub fn magnitude(&self) -> BigUint {
        digits_to_biguint(&self.repr, self.base)
    }

    fn signed_magnitude(&self) -> BigInt {
        let magnitude = BigInt::from(self.magnitude());
        match self.sign {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        }
    }

    /// Drop zero digits right of the radix point and leading zeros left of
    /// it. A zero literal is always positive.
    fn trimmed(mut self) -> Self {
        let leading = self
            .repr
            .iter()
            .take(self.radix)
            .take_while(|d| **d == 0)
            .count();
        self.repr.drain(..leading);
        self.radix -= leading;
        while self.repr.last() == Some(&0) && self.repr.len() > self.radix {
            self.repr.pop();
        }
        if self.is_zero() {
            self.repr.clear();
            self.radix = 0;
            self.sign = Sign::Positive;
        }
        self
    }

    fn from_scaled(value: &BigInt, radix: usize, base: u32) -> Self {
        let (sign, repr) = bigint_to_digits(value, base);
        Self {
            repr,
            radix,
            base,
            sign: if sign == BigSign::Minus {
                Sign::Negative
            } else {
                Sign::Positive
            },
        }
        .trimmed()
    }

    /// Exact sum.
    pub fn try_add(&self, other: &Literal) -> Result<Literal> {
        ensure_compatible(self.base, other.base)?;
        let radix = self.radix.max(other.radix);
        let align = |literal: &Literal| {
            literal.signed_magnitude() * BigInt::from(literal.base).pow((radix - literal.radix) as u32)
        };
        Ok(Self::from_scaled(&(align(self) + align(other)), radix, self.base))
    }

    /// Exact product.
    pub fn try_mul(&self, other: &Literal) -> Result<Literal> {
        ensure_compatible(self.base, other.base)?;
        let value = self.signed_magnitude() * other.signed_magnitude();
        Ok(Self::from_scaled(&value, self.radix + other.radix, self.base))
    }

    pub fn negated(&self) -> Literal {
        let mut ret = self.clone();
        if !ret.is_zero() {
            ret.sign = ret.sign.flip();
        }
        ret
    }

    /// Re-express in `out_base`. The integer part converts exactly; the
    /// fractional part is approximated to `max_fractional_digits` places.
    pub fn convert_base(&self, out_base: u32, max_fractional_digits: usize) -> Result<Literal> {
        let out_base = ensure_base(out_base as i64)?;
        let integer = digits_to_biguint(&self.repr[self.radix.min(self.repr.len())..], self.base);

        let mut fraction = 0.0;
        for (i, digit) in self.repr.iter().take(self.radix).rev().enumerate() {
            fraction += *digit as f64 * (self.base as f64).powi(-(i as i32 + 1));
        }

        let mut value = integer;
        let mut radix = 0;
        while fraction > 0.0 && radix < max_fractional_digits {
            fraction *= out_base as f64;
            let digit = fraction.trunc();
            fraction -= digit;
            value = value * out_base + BigUint::from_f64(digit).unwrap_or_default();
            radix += 1;
        }
        if radix == max_fractional_digits && fraction > 0.0 {
            warn!(
                from = self.base,
                to = out_base,
                max_fractional_digits,
                "Fractional part truncated during base conversion"
            );
        }

        Ok(Self {
            repr: biguint_to_digits(&value, out_base),
            radix,
            base: out_base,
            sign: self.sign,
        }
        .trimmed())
    }

    pub fn to_padic(&self) -> Result<PAdic> {
        self.to_padic_with_config(&EngineConfig::default())
    }

    pub fn to_padic_with_config(&self, config: &EngineConfig) -> Result<PAdic> {
        let lowest_power = -(self.radix as i64);
        let source = LiteralSource::new(self.repr.clone());
        match self.sign {
            _ if self.is_zero() => PAdic::from_digits_with_config(self.base, &[], config),
            Sign::Positive => PAdic::from_source_with_config(self.base, source, lowest_power, config),
            Sign::Negative => PAdic::from_source_with_config(
                self.base,
                ScaledSource::new(source, -1),
                lowest_power,
                config,
            ),
        }
    }
}

impl FromStr for Literal {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        Literal::parse(s, None)
    }
}

/// `[-]<int>[.<frac>]_<base>`. Digits beyond `z` print as `(<decimal>)`.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut repr = self.repr.clone();
        if repr.len() < self.radix {
            repr.resize(self.radix, 0);
        }
        let text = |digits: &[Digit]| -> String {
            digits
                .iter()
                .rev()
                .map(|d| match digit_char(*d) {
                    Some(c) => c.to_string(),
                    None => format!("({})", d),
                })
                .collect()
        };
        let (frac, int) = repr.split_at(self.radix);
        if self.sign == Sign::Negative {
            write!(f, "-")?;
        }
        let int = text(int);
        write!(f, "{}", if int.is_empty() { "0" } else { &int })?;
        if self.radix > 0 {
            write!(f, ".{}", text(frac))?;
        }
        write!(f, "_{}", self.base)
    }
}

/// Drop one pair of parentheses around the whole of `text`.
fn unwrap_parens(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Literal {
        Literal::parse(text, None).unwrap()
    }

    #[test]
    fn test_parse_strings() {
        let parsed = literal("123.45");
        assert_eq!(parsed.repr, vec![5, 4, 3, 2, 1]);
        assert_eq!(parsed.radix, 2);
        assert_eq!(parsed.sign, Sign::Positive);

        let parsed = literal("-123.45");
        assert_eq!(parsed.sign, Sign::Negative);
        assert_eq!(parsed.repr, vec![5, 4, 3, 2, 1]);

        let parsed = literal(" ( 00123.4500 ) ");
        assert_eq!(parsed.repr, vec![5, 4, 3, 2, 1]);
        assert_eq!(parsed.radix, 2);

        let parsed = literal("-(12)");
        assert_eq!(parsed.sign, Sign::Negative);
        assert_eq!(parsed.repr, vec![2, 1]);
        assert_eq!(literal("(101)_2").repr, vec![1, 0, 1]);

        let parsed = literal("0.005");
        assert_eq!(parsed.repr, vec![5, 0, 0]);
        assert_eq!(parsed.radix, 3);
    }

    #[test]
    fn test_parse_base() {
        let parsed = Literal::parse("1011", Some(2)).unwrap();
        assert_eq!(parsed.repr, vec![1, 1, 0, 1]);
        assert_eq!(parsed.base, 2);

        let parsed = Literal::parse("1011_2", Some(7)).unwrap();
        assert_eq!(parsed.base, 2);

        let parsed = literal("zz_36");
        assert_eq!(parsed.repr, vec![35, 35]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Literal::parse("129", Some(2)),
            Err(MathError::InvalidDigit { digit: 9, base: 2 })
        );
        assert_eq!(
            Literal::parse("12#4", None),
            Err(MathError::InvalidCharacter('#'))
        );
        assert!(matches!(
            Literal::parse("12_x", None),
            Err(MathError::InvalidLiteral(_))
        ));
        assert!(matches!(
            Literal::parse("1.2.3", None),
            Err(MathError::InvalidLiteral(_))
        ));
        assert_eq!(Literal::parse("12_1", None), Err(MathError::InvalidBase(1)));
        // parentheses only around the whole literal
        assert_eq!(
            Literal::parse("1(2)3", None),
            Err(MathError::InvalidCharacter(')'))
        );
        assert_eq!(
            Literal::parse("(12", None),
            Err(MathError::InvalidCharacter('('))
        );
    }

    #[test]
    fn test_parse_zero() {
        for text in ["", "0", "000", "-0", "0.000"] {
            let parsed = literal(text);
            assert!(parsed.is_zero(), "{text:?} should parse as zero");
            assert_eq!(parsed.to_string(), "0_10");
        }
    }

    #[test]
    fn test_from_integer() {
        let parsed = Literal::from_integer(12, 2).unwrap();
        assert_eq!(parsed.to_string(), "1100_2");

        let parsed = Literal::from_integer(-12, 10).unwrap();
        assert_eq!(parsed.sign, Sign::Negative);
        assert_eq!(parsed.repr, vec![2, 1]);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Literal::from_f64(12.25, 2, 10).unwrap().to_string(), "1100.01_2");
        assert_eq!(Literal::from_f64(-12.25, 2, 10).unwrap().to_string(), "-1100.01_2");
        assert_eq!(Literal::from_f64(0.005, 10, 10).unwrap().to_string(), "0.005_10");

        let approx = Literal::from_f64(123.45, 10, 10).unwrap();
        assert_eq!(approx.repr, vec![5, 4, 3, 2, 1]);
        assert_eq!(approx.radix, 2);

        assert!(matches!(
            Literal::from_f64(f64::NAN, 10, 10),
            Err(MathError::NonFinite(_))
        ));
        assert!(matches!(
            Literal::from_f64(f64::INFINITY, 10, 10),
            Err(MathError::NonFinite(_))
        ));
    }

    #[test]
    fn test_from_digits() {
        let parsed = Literal::from_digits(&[3, 2], 2).unwrap();
        assert_eq!(parsed.repr, vec![1, 1, 1]);
        assert_eq!(
            Literal::from_digits(&[1, -1], 10),
            Err(MathError::NegativeDigit(-1))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(literal("0").to_string(), "0_10");
        assert_eq!(literal("-12.25").to_string(), "-12.25_10");
        assert_eq!(literal("0.005").to_string(), "0.005_10");
    }

    #[test]
    fn test_mul() {
        let a = Literal::from_f64(3.25, 2, 10).unwrap();
        let b = Literal::from_f64(2.5, 2, 10).unwrap();
        assert_eq!(a.try_mul(&b).unwrap().to_string(), "1000.001_2");

        let a = literal("123.25");
        let b = literal("-2");
        assert_eq!(a.try_mul(&b).unwrap().to_string(), "-246.5_10");
    }

    #[test]
    fn test_add() {
        assert_eq!(literal("123").try_add(&literal("-200")).unwrap().to_string(), "-77_10");
        assert_eq!(literal("-123").try_add(&literal("2")).unwrap().to_string(), "-121_10");
        assert_eq!(literal("0.25").try_add(&literal("0.75")).unwrap().to_string(), "1_10");

        let a = Literal::from_f64(3.25, 2, 10).unwrap();
        let b = Literal::from_f64(2.5, 2, 10).unwrap();
        assert_eq!(a.try_add(&b).unwrap().to_string(), "101.11_2");
    }

    #[test]
    fn test_add_base_mismatch() {
        let a = Literal::parse("1", Some(2)).unwrap();
        let b = Literal::parse("1", Some(3)).unwrap();
        assert_eq!(
            a.try_add(&b),
            Err(MathError::BaseMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_convert_base() {
        let converted = literal("12.25").convert_base(2, 10).unwrap();
        assert_eq!(converted.to_string(), "1100.01_2");

        let back = converted.convert_base(10, 10).unwrap();
        assert_eq!(back.to_string(), "12.25_10");

        let truncated = literal("0.1").convert_base(3, 4).unwrap();
        assert_eq!(truncated.radix, 4);
    }

    #[test]
    fn test_valuation() {
        assert_eq!(literal("12.5").valuation(), Valuation::new(-1));
        assert_eq!(literal("1200").valuation(), Valuation::new(2));
        assert!(literal("0").valuation().is_infinite());
    }

    #[test]
    fn test_serde_round_trip() {
        let original = literal("-101.1_2");
        let json = serde_json::to_string(&original).unwrap();
        let restored: Literal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_to_padic() {
        use crate::format::RenderOptions;
        let number = literal("-12.25").to_padic().unwrap();
        assert_eq!(number.render(4, RenderOptions::default()).unwrap(), "9987.75");
    }
}
