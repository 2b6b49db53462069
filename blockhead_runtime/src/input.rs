//! Entry-field validation: what the control panel accepts before
//! anything reaches the engine.
//!
//! Entries are digit strings, most-significant first, never parsed
//! as decimal integers so non-decimal bases work unchanged.

use std::fmt;

use blockhead_engine::arithmetic::{digit_value, digits_value, parse_operand};
use blockhead_engine::domain::{BoardConstants, Mode};
use blockhead_engine::error::EngineError;

use crate::error::InputError;

/// Which of the two entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySlot {
    First,
    Second,
}

impl fmt::Display for EntrySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntrySlot::First => "first",
            EntrySlot::Second => "second",
        })
    }
}

/// Check one keystroke against the entry it would extend.
pub fn validate_keystroke(
    entry: &str,
    ch: char,
    constants: &BoardConstants,
) -> Result<(), InputError> {
    digit_value(ch, constants.base).map_err(|_| InputError::InvalidDigit {
        digit: ch,
        base: constants.base,
    })?;
    if entry.chars().count() >= constants.column_count {
        return Err(InputError::TooWide {
            width: constants.column_count,
        });
    }
    Ok(())
}

/// Validate both entries for "Draw Blocks" and return them zero-padded
/// to the column count.
pub fn validate_operands(
    first: &str,
    second: &str,
    mode: Mode,
    constants: &BoardConstants,
) -> Result<(String, String), InputError> {
    let first_digits = parse_entry(EntrySlot::First, first, constants)?;
    let second_digits = parse_entry(EntrySlot::Second, second, constants)?;

    if mode == Mode::Subtract
        && digits_value(&first_digits, constants.base)
            < digits_value(&second_digits, constants.base)
    {
        return Err(InputError::SubtrahendTooLarge {
            first: first.to_string(),
            second: second.to_string(),
        });
    }

    let width = constants.column_count;
    Ok((
        format!("{:0>width$}", first, width = width),
        format!("{:0>width$}", second, width = width),
    ))
}

fn parse_entry(
    slot: EntrySlot,
    text: &str,
    constants: &BoardConstants,
) -> Result<Vec<u32>, InputError> {
    if text.is_empty() {
        return Err(InputError::EmptyEntry(slot));
    }
    parse_operand(text, constants.base, constants.column_count).map_err(|e| match e {
        EngineError::InvalidDigit { digit, base } => InputError::InvalidDigit { digit, base },
        _ => InputError::TooWide {
            width: constants.column_count,
        },
    })
}
