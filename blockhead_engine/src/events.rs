/// BlockHead Engine: Commands and Board Events
///
/// Commands are pure data: the caller's intent and payload only.
/// Board events are pure data: what changed, in order, so a
/// presentation layer can animate without redoing arithmetic.
///
/// Schema version is locked at 1. Envelopes with any other
/// schema_version are rejected by the engine.

use serde::{Deserialize, Serialize};

use crate::domain::{BlockId, ColumnRef, Mode};

/// Schema version for command envelopes.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One caller request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Lay out a new problem. Digit strings are most-significant first.
    DrawBlocks {
        first: String,
        second: String,
        mode: Mode,
    },
    /// A drag ended with `block` released over `target`.
    PlaceBlock {
        block: BlockId,
        source: ColumnRef,
        target: ColumnRef,
    },
    /// Carry control clicked under answer column `column`.
    Carry { column: usize },
    /// Borrow control clicked on answer column `column` (the lender).
    Borrow { column: usize },
    /// Discard the board.
    New,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DrawBlocks { .. } => "draw_blocks",
            Command::PlaceBlock { .. } => "place_block",
            Command::Carry { .. } => "carry",
            Command::Borrow { .. } => "borrow",
            Command::New => "new",
        }
    }
}

/// Sequenced command, as recorded in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub sequence: u64,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub command: Command,
}

impl CommandEnvelope {
    pub fn new(sequence: u64, command: Command) -> Self {
        Self {
            sequence,
            schema_version: SCHEMA_VERSION,
            command,
        }
    }
}

/// One observable change on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    BlockCreated {
        block: BlockId,
        column: ColumnRef,
        value: u32,
    },
    BlockMoved {
        block: BlockId,
        from: ColumnRef,
        to: ColumnRef,
    },
    BlockRemoved {
        block: BlockId,
        column: ColumnRef,
    },
    ColumnTotalChanged {
        column: ColumnRef,
        total: u32,
    },
    CarryControlShown {
        column: usize,
    },
    CarryControlRemoved {
        column: usize,
    },
    BorrowControlShown {
        column: usize,
    },
    BorrowControlRemoved {
        column: usize,
    },
    AnswerReady {
        answer: String,
    },
}
