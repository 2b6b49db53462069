//! Engine error taxonomy.
//!
//! A rejected drop is NOT an error: it is `Outcome::Rejected`.
//! Everything here is either a malformed command or a desynchronised
//! caller (invalid state).

use thiserror::Error;

use crate::domain::{BlockId, ColumnRef, Mode};

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid digit {digit:?} for base {base}")]
    InvalidDigit { digit: char, base: u32 },

    #[error("operand {operand:?} is wider than {width} columns")]
    OperandTooWide { operand: String, width: usize },

    #[error("subtrahend {second:?} exceeds minuend {first:?}")]
    SubtrahendExceedsMinuend { first: String, second: String },

    #[error("unsupported base {0}: must be between 2 and 10")]
    UnsupportedBase(u32),

    #[error("unsupported column count {0}: must be between 1 and 9")]
    UnsupportedColumnCount(usize),

    #[error("no problem has been drawn")]
    NoProblem,

    #[error("a problem is already drawn; start a new one first")]
    ProblemAlreadyDrawn,

    #[error("column {0} does not exist")]
    NoSuchColumn(ColumnRef),

    #[error("block {block} is not held by column {column}")]
    BlockNotFound { block: BlockId, column: ColumnRef },

    #[error("invalid state: answer column {0} has no carry control")]
    NoCarryControl(usize),

    #[error("invalid state: answer column {0} is the most significant and cannot carry")]
    CarryOverflow(usize),

    #[error("invalid state: answer column {0} has no borrow control")]
    NoBorrowControl(usize),

    #[error("invalid state: borrow cascade ran out of units at answer column {0}")]
    BorrowExhausted(usize),

    #[error("invalid state: {command} is not available in {mode} mode")]
    WrongMode { command: &'static str, mode: Mode },

    #[error("sequence violation: expected {expected}, got {got}")]
    SequenceViolation { expected: u64, got: u64 },

    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaVersionMismatch { expected: u32, got: u32 },
}

impl EngineError {
    /// Programming errors: the caller asked for a transition the
    /// board does not currently offer.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            EngineError::NoCarryControl(_)
                | EngineError::CarryOverflow(_)
                | EngineError::NoBorrowControl(_)
                | EngineError::BorrowExhausted(_)
                | EngineError::WrongMode { .. }
                | EngineError::BlockNotFound { .. }
        )
    }
}
