use blockhead_engine::error::EngineError;
use thiserror::Error;

use crate::input::EntrySlot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Why a keystroke or a pair of entries cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{digit}' is not a digit in base {base}")]
    InvalidDigit { digit: char, base: u32 },

    #[error("entry is limited to {width} digits")]
    TooWide { width: usize },

    #[error("{0} entry is empty")]
    EmptyEntry(EntrySlot),

    #[error("cannot subtract {second} from {first}")]
    SubtrahendTooLarge { first: String, second: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("mode cannot change while a problem is on the board")]
    ModeLocked,

    #[error("entries cannot change while a problem is on the board")]
    EntriesLocked,

    #[error("replays disagree: {first} vs {second}")]
    NonDeterministic { first: String, second: String },
}
