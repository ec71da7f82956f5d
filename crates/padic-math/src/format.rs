//! Text rendering helpers shared by numbers and literals.

use crate::error::{MathError, Result};
use crate::Digit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Keep leading zeros.
    pub pad: bool,
    /// Append `_<base>`.
    pub include_base: bool,
}

impl RenderOptions {
    pub fn padded() -> Self {
        Self {
            pad: true,
            ..Self::default()
        }
    }

    pub fn with_base() -> Self {
        Self {
            include_base: true,
            ..Self::default()
        }
    }
}

/// Base-36 character for a digit in `[0, 36)`.
pub fn digit_char(digit: Digit) -> Option<char> {
    if !(0..36).contains(&digit) {
        return None;
    }
    char::from_digit(digit as u32, 36)
}

pub fn ensure_renderable(base: u32) -> Result<()> {
    if base > 36 {
        return Err(MathError::UnsupportedRadix(base));
    }
    Ok(())
}

/// Digits most-significant first, as text.
pub fn digits_to_string(digits: impl IntoIterator<Item = Digit>, base: u32) -> Result<String> {
    ensure_renderable(base)?;
    digits
        .into_iter()
        .map(|d| digit_char(d).ok_or(MathError::InvalidDigit { digit: d.unsigned_abs() as u32, base }))
        .collect()
}

/// Insert a `.` so that `radix` characters follow it.
pub fn insert_radix(text: &str, radix: usize) -> String {
    if radix == 0 {
        return text.to_string();
    }
    let split = text.len().saturating_sub(radix);
    format!("{}.{}", &text[..split], &text[split..])
}

/// Drop leading zeros, keeping a `0` before a bare radix point and
/// rendering nothing at all as `0`.
pub fn strip_leading_zeros(text: &str) -> String {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else if trimmed.starts_with('.') {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    }
}
