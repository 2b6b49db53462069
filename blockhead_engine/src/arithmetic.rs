/// BlockHead Engine: Place-Value Arithmetic Primitives
///
/// Digit strings are most-significant first on the wire and
/// least-significant first inside the engine (index 0 = ones).
/// All values are unsigned integers. No float.

use crate::error::EngineError;

/// Smallest radix the engine accepts.
pub const MIN_BASE: u32 = 2;

/// Largest radix the engine accepts. Digits are always `0-9`.
pub const MAX_BASE: u32 = 10;

/// Parse an operand string into least-significant-first digits,
/// left-padded with zeros to `width` columns.
///
/// Empty input is read as zero.
pub fn parse_operand(text: &str, base: u32, width: usize) -> Result<Vec<u32>, EngineError> {
    if text.len() > width {
        return Err(EngineError::OperandTooWide {
            operand: text.to_string(),
            width,
        });
    }

    let mut digits = Vec::with_capacity(width);
    for ch in text.chars().rev() {
        digits.push(digit_value(ch, base)?);
    }
    digits.resize(width, 0);
    Ok(digits)
}

/// Numeric value of a single digit character in `base`.
pub fn digit_value(ch: char, base: u32) -> Result<u32, EngineError> {
    match ch.to_digit(10) {
        Some(d) if d < base => Ok(d),
        _ => Err(EngineError::InvalidDigit { digit: ch, base }),
    }
}

/// Character for a digit already known to be `< base <= 10`.
pub fn digit_char(digit: u32) -> char {
    char::from_digit(digit, 10).unwrap_or('?')
}

/// Value of least-significant-first digits in `base`.
pub fn digits_value(digits: &[u32], base: u32) -> u64 {
    digits
        .iter()
        .rev()
        .fold(0u64, |acc, &d| acc * base as u64 + d as u64)
}

/// Render `value` in `base`, most-significant first, zero-padded to `width`.
pub fn format_value(mut value: u64, base: u32, width: usize) -> String {
    let mut out = Vec::new();
    while value > 0 {
        out.push(digit_char((value % base as u64) as u32));
        value /= base as u64;
    }
    while out.len() < width.max(1) {
        out.push('0');
    }
    out.iter().rev().collect()
}

/// Label shown under a column: one digit below `base`,
/// otherwise the total written out in `base` (e.g. `15` → "15", base 4 `5` → "11").
pub fn format_column_total(total: u32, base: u32) -> String {
    format_value(total as u64, base, 1)
}

/// Final answer from least-significant-first column totals.
/// Leading zero columns are dropped; an all-zero answer is `"0"`.
pub fn format_answer(totals: &[u32]) -> String {
    let text: String = totals
        .iter()
        .rev()
        .skip_while(|&&t| t == 0)
        .map(|&t| digit_char(t))
        .collect();
    if text.is_empty() {
        "0".to_string()
    } else {
        text
    }
}
