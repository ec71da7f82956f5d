use crate::config::EngineConfig;
use crate::error::{ensure_base, Result};
use crate::format::{digit_char, ensure_renderable, insert_radix, strip_leading_zeros, RenderOptions};
use crate::literal::Literal;
use crate::normalize::Normalizer;
use crate::ops::{NegationNode, ProductNode, SumNode};
use crate::source::{DigitSource, LiteralSource, NumberSource, ShiftedSource};
use crate::valuation::Valuation;
use crate::Digit;
use num_bigint::BigInt;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// A lazily evaluated p-adic number: `sum(c_k * base^k)` for `k >= v`.
///
/// Cloning is cheap and shares the underlying digit cache. Numbers are
/// single-threaded (`Rc` plus interior mutability); build one graph per
/// thread.
#[derive(Clone)]
pub struct PAdic {
    base: u32,
    max_digits: usize,
    node: Rc<Node>,
}

pub(crate) enum Node {
    Digits(DigitsNode),
    Sum(SumNode),
    Product(ProductNode),
    Negation(NegationNode),
}

impl Node {
    fn valuation(&self) -> Valuation {
        match self {
            Node::Digits(node) => node.valuation(),
            Node::Sum(node) => node.valuation(),
            Node::Product(node) => node.valuation(),
            Node::Negation(node) => node.valuation(),
        }
    }

    fn coefficient(&self, power: i64) -> Digit {
        match self {
            Node::Digits(node) => node.coefficient(power),
            Node::Sum(node) => node.coefficient(power),
            Node::Product(node) => node.coefficient(power),
            Node::Negation(node) => node.coefficient(power),
        }
    }
}

/// Normalized digits of a raw source, position 0 sitting at `origin`.
pub(crate) struct DigitsNode {
    digits: Normalizer<Box<dyn DigitSource>>,
    origin: i64,
    max_digits: usize,
    valuation: OnceCell<Valuation>,
}

impl DigitsNode {
    fn valuation(&self) -> Valuation {
        *self.valuation.get_or_init(|| {
            if self.digits.is_zero_from(0) {
                return Valuation::infinite();
            }
            let support = self.digits.support();
            let limit = support.unwrap_or(self.max_digits);
            for pos in 0..limit {
                if self.digits.at(pos) != 0 {
                    return Valuation::new(self.origin + pos as i64);
                }
            }
            if support.is_none() {
                warn!(
                    origin = self.origin,
                    max_digits = self.max_digits,
                    "No nonzero digit within lookahead; treating number as zero"
                );
            }
            Valuation::infinite()
        })
    }

    fn coefficient(&self, power: i64) -> Digit {
        let pos = power - self.origin;
        if pos < 0 {
            return 0;
        }
        self.digits.at(pos as usize)
    }
}

impl PAdic {
    pub(crate) fn from_node(base: u32, max_digits: usize, node: Node) -> Self {
        Self {
            base,
            max_digits,
            node: Rc::new(node),
        }
    }

    /// Wrap a raw digit source. Position 0 of `source` becomes the
    /// coefficient of `base^lowest_power`.
    pub fn from_source<S: DigitSource + 'static>(base: u32, source: S, lowest_power: i64) -> Result<Self> {
        Self::from_source_with_config(base, source, lowest_power, &EngineConfig::default())
    }

    pub fn from_source_with_config<S: DigitSource + 'static>(
        base: u32,
        source: S,
        lowest_power: i64,
        config: &EngineConfig,
    ) -> Result<Self> {
        let base = ensure_base(base as i64)?;
        let (origin, source): (i64, Box<dyn DigitSource>) = if lowest_power > 0 {
            (0, Box::new(ShiftedSource::new(source, lowest_power)))
        } else {
            (lowest_power, Box::new(source))
        };
        let node = DigitsNode {
            digits: Normalizer::new(base, source)?,
            origin,
            max_digits: config.max_digits,
            valuation: OnceCell::new(),
        };
        Ok(Self::from_node(base, config.max_digits, Node::Digits(node)))
    }

    /// Integer from raw digits, least-significant first. Out-of-range and
    /// negative digits are carried during normalization.
    pub fn from_digits(base: u32, digits: &[Digit]) -> Result<Self> {
        Self::from_digits_with_config(base, digits, &EngineConfig::default())
    }

    pub fn from_digits_with_config(base: u32, digits: &[Digit], config: &EngineConfig) -> Result<Self> {
        Self::from_source_with_config(base, LiteralSource::new(digits.to_vec()), 0, config)
    }

    pub fn zero(base: u32) -> Result<Self> {
        Self::from_digits(base, &[])
    }

    /// Parse a literal such as `"-123.45"` or `"1011_2"`. A `_<base>` suffix
    /// takes precedence over `base`, which itself defaults to 10.
    pub fn parse(literal: &str, base: Option<u32>) -> Result<Self> {
        Literal::parse(literal, base)?.to_padic()
    }

    pub fn from_integer(n: i64, base: u32) -> Result<Self> {
        Literal::from_integer(n, base)?.to_padic()
    }

    pub fn from_bigint(n: &BigInt, base: u32) -> Result<Self> {
        Literal::from_bigint(n, base)?.to_padic()
    }

    pub fn from_f64(x: f64, base: u32) -> Result<Self> {
        let config = EngineConfig::default();
        Literal::from_f64(x, base, config.max_fractional_digits)?.to_padic_with_config(&config)
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    /// Exponent of the lowest nonzero coefficient. Computed once per number.
    pub fn valuation(&self) -> Valuation {
        self.node.valuation()
    }

    /// Coefficient of `base^power`, always in `[0, base)`.
    pub fn digit_at(&self, power: i64) -> Digit {
        self.node.coefficient(power)
    }

    /// Coefficients of `base^0 .. base^(len-1)`.
    pub fn digits(&self, len: usize) -> Vec<Digit> {
        (0..len as i64).map(|power| self.digit_at(power)).collect()
    }

    /// True when the number vanishes modulo `base^n`: no fractional part and
    /// no nonzero coefficient among `base^0 .. base^(n-1)`.
    pub fn is_zero_to(&self, n: usize) -> bool {
        match self.valuation() {
            Valuation::Infinite => true,
            Valuation::Finite(v) if v < 0 => false,
            Valuation::Finite(_) => (0..n as i64).all(|power| self.digit_at(power) == 0),
        }
    }

    /// Multiply by `base^k`.
    pub fn shift(&self, k: i64) -> Result<Self> {
        let origin = match self.valuation() {
            Valuation::Infinite => return Ok(self.clone()),
            Valuation::Finite(v) => v.min(0),
        };
        let config = EngineConfig::default().with_max_digits(self.max_digits);
        Self::from_source_with_config(
            self.base,
            NumberSource::new(self.clone(), origin),
            origin + k,
            &config,
        )
    }

    /// Render `len` integer digits plus every fractional digit, most
    /// significant first.
    pub fn render(&self, len: usize, options: RenderOptions) -> Result<String> {
        ensure_renderable(self.base)?;
        let mut text = match self.valuation() {
            Valuation::Infinite => "0".to_string(),
            Valuation::Finite(v) => {
                let radix = if v < 0 { (-v) as usize } else { 0 };
                let raw: String = (0..radix + len)
                    .rev()
                    .map(|i| {
                        let power = i as i64 - radix as i64;
                        digit_char(self.digit_at(power)).unwrap_or('?')
                    })
                    .collect();
                let text = insert_radix(&raw, radix);
                if options.pad {
                    if text.starts_with('.') {
                        format!("0{}", text)
                    } else {
                        text
                    }
                } else {
                    strip_leading_zeros(&text)
                }
            }
        };
        if options.include_base {
            text.push_str(&format!("_{}", self.base));
        }
        Ok(text)
    }
}

impl fmt::Display for PAdic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render(crate::DISPLAY_DIGITS, RenderOptions::default()) {
            Ok(text) => write!(f, "{}", text),
            Err(_) => write!(f, "{:?}", self.digits(crate::DISPLAY_DIGITS)),
        }
    }
}

impl fmt::Debug for PAdic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PAdic(base={}, valuation={}, digits={:?})",
            self.base,
            self.valuation(),
            self.digits(10)
        )
    }
}
