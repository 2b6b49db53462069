/// BlockHead Engine: Core Domain Types
///
/// Pure data plus read-only queries. No transition logic.
/// Ownership is structural: a Board owns three Numbers, a Number owns
/// its Columns, a Column owns its Blocks. Neighbours are found by
/// index arithmetic (position 0 = ones, increasing leftward).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arithmetic::{format_answer, format_column_total, MAX_BASE, MIN_BASE};
use crate::error::EngineError;
use crate::events::BoardEvent;

// ── Identities ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Add,
    Subtract,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Add => "add",
            Mode::Subtract => "subtract",
        }
    }

    /// The other operator (the +/- sign button).
    pub fn toggled(self) -> Self {
        match self {
            Mode::Add => Mode::Subtract,
            Mode::Subtract => Mode::Add,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the three numbers on the board a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRole {
    First,
    Second,
    Answer,
}

impl NumberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberRole::First => "first",
            NumberRole::Second => "second",
            NumberRole::Answer => "answer",
        }
    }

    pub fn is_answer(self) -> bool {
        self == NumberRole::Answer
    }
}

/// Stable address of one column on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub number: NumberRole,
    pub position: usize,
}

impl ColumnRef {
    pub fn new(number: NumberRole, position: usize) -> Self {
        Self { number, position }
    }

    pub fn answer(position: usize) -> Self {
        Self::new(NumberRole::Answer, position)
    }

    /// The answer column with the same place value.
    pub fn matching_answer(self) -> Self {
        Self::answer(self.position)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.number.as_str(), self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Blocks, Columns, Numbers ───────────────────────────────────────

/// A stack of `value` units. Never zero-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub value: u32,
    /// Column currently holding the block.
    pub owner: ColumnRef,
    /// Column where the block was first created.
    pub origin: ColumnRef,
    /// Operand blocks not yet played.
    pub movable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub number: NumberRole,
    pub position: usize,
    /// Stacking order, bottom first.
    pub blocks: Vec<Block>,
    pub has_carry_control: bool,
    pub has_borrow_control: bool,
}

impl Column {
    pub fn new(number: NumberRole, position: usize) -> Self {
        Self {
            number,
            position,
            blocks: Vec::new(),
            has_carry_control: false,
            has_borrow_control: false,
        }
    }

    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef::new(self.number, self.position)
    }

    /// Sum of block values. Always recomputed.
    pub fn total(&self) -> u32 {
        self.blocks.iter().map(|b| b.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn top_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn display_total(&self, base: u32) -> String {
        format_column_total(self.total(), base)
    }
}

/// One operand or the answer: columns least-significant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    pub role: NumberRole,
    pub columns: Vec<Column>,
}

impl Number {
    pub fn new(role: NumberRole, width: usize) -> Self {
        Self {
            role,
            columns: (0..width).map(|p| Column::new(role, p)).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    pub fn column_mut(&mut self, position: usize) -> Option<&mut Column> {
        self.columns.get_mut(position)
    }

    /// Next more-significant column.
    pub fn column_to_left(&self, position: usize) -> Option<&Column> {
        self.columns.get(position + 1)
    }

    /// Next less-significant column.
    pub fn column_to_right(&self, position: usize) -> Option<&Column> {
        position.checked_sub(1).and_then(|p| self.columns.get(p))
    }

    pub fn totals(&self) -> Vec<u32> {
        self.columns.iter().map(Column::total).collect()
    }

    /// True once every column has been played out.
    pub fn is_exhausted(&self) -> bool {
        self.columns.iter().all(|c| c.total() == 0)
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// Radix and width, injected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoardConstants {
    pub base: u32,
    pub column_count: usize,
}

impl Default for BoardConstants {
    fn default() -> Self {
        Self {
            base: 10,
            column_count: 3,
        }
    }
}

impl BoardConstants {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_BASE..=MAX_BASE).contains(&self.base) {
            return Err(EngineError::UnsupportedBase(self.base));
        }
        if !(1..=9).contains(&self.column_count) {
            return Err(EngineError::UnsupportedColumnCount(self.column_count));
        }
        Ok(())
    }

    /// Answer width: one overflow column in ADD mode.
    pub fn answer_width(&self, mode: Mode) -> usize {
        match mode {
            Mode::Add => self.column_count + 1,
            Mode::Subtract => self.column_count,
        }
    }
}

// ── Transition outcome ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Rejected,
}

/// Structured result of one applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub sequence: u64,
    pub outcome: Outcome,
    pub events: Vec<BoardEvent>,
    /// Final answer, once the problem is complete.
    pub answer: Option<String>,
    /// Why a drop was rejected. Empty when accepted.
    pub reason: String,
}

impl TransitionResult {
    pub fn accepted(sequence: u64) -> Self {
        Self {
            sequence,
            outcome: Outcome::Accepted,
            events: Vec::new(),
            answer: None,
            reason: String::new(),
        }
    }

    pub fn rejected(sequence: u64, reason: impl Into<String>) -> Self {
        Self {
            sequence,
            outcome: Outcome::Rejected,
            events: Vec::new(),
            answer: None,
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}

// ── Board ──────────────────────────────────────────────────────────

/// Everything on screen for one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub mode: Mode,
    pub constants: BoardConstants,
    pub first: Number,
    pub second: Number,
    pub answer: Number,
    /// Active, unresolved carry controls.
    pub carry_count: u32,
    pub next_block_id: u64,
    /// Last answer surfaced to the caller.
    pub answer_text: Option<String>,
}

impl Board {
    pub fn number(&self, role: NumberRole) -> &Number {
        match role {
            NumberRole::First => &self.first,
            NumberRole::Second => &self.second,
            NumberRole::Answer => &self.answer,
        }
    }

    pub fn number_mut(&mut self, role: NumberRole) -> &mut Number {
        match role {
            NumberRole::First => &mut self.first,
            NumberRole::Second => &mut self.second,
            NumberRole::Answer => &mut self.answer,
        }
    }

    pub fn column(&self, at: ColumnRef) -> Option<&Column> {
        self.number(at.number).column(at.position)
    }

    pub fn column_mut(&mut self, at: ColumnRef) -> Option<&mut Column> {
        self.number_mut(at.number).column_mut(at.position)
    }

    pub fn numbers(&self) -> [&Number; 3] {
        [&self.first, &self.second, &self.answer]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.numbers()
            .into_iter()
            .flat_map(|n| n.columns.iter())
            .flat_map(|c| c.blocks.iter())
    }

    pub fn find_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks().find(|b| b.id == id)
    }

    /// Answer columns currently showing a borrow control.
    pub fn pending_borrows(&self) -> usize {
        self.answer
            .columns
            .iter()
            .filter(|c| c.has_borrow_control)
            .count()
    }

    pub fn carry_controls(&self) -> usize {
        self.answer
            .columns
            .iter()
            .filter(|c| c.has_carry_control)
            .count()
    }

    /// Every playable block has been played.
    pub fn operands_exhausted(&self) -> bool {
        match self.mode {
            Mode::Add => self.first.is_exhausted() && self.second.is_exhausted(),
            Mode::Subtract => self.second.is_exhausted(),
        }
    }

    /// The answer if the problem is complete, else `None`.
    pub fn calc_answer(&self) -> Option<String> {
        let settled = match self.mode {
            Mode::Add => self.carry_count == 0,
            Mode::Subtract => self.pending_borrows() == 0,
        };
        if settled && self.operands_exhausted() {
            Some(format_answer(&self.answer.totals()))
        } else {
            None
        }
    }

    /// Blocks the player may still drag.
    pub fn movable_blocks(&self) -> Vec<(ColumnRef, BlockId)> {
        self.blocks()
            .filter(|b| b.movable)
            .map(|b| (b.owner, b.id))
            .collect()
    }
}
