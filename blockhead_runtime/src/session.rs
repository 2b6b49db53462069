//! Session: the control panel without widgets.
//!
//! Holds the two entry fields, the selected operator and the engine.
//! Entries and operator are editable only while no problem is drawn;
//! "New" clears the board and the entries but keeps the operator.
//!
//! Every command goes through the engine; the transcript is the
//! engine's history.

use blockhead_engine::domain::{BlockId, Board, BoardConstants, ColumnRef, Mode, TransitionResult};
use blockhead_engine::engine::BlockEngine;
use blockhead_engine::hashing::canonical_hash;
use log::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::input::{validate_keystroke, validate_operands, EntrySlot};
use crate::transcript::Transcript;

#[derive(Debug, Clone)]
pub struct Session {
    engine: BlockEngine,
    mode: Mode,
    first: String,
    second: String,
}

impl Session {
    pub fn new(constants: BoardConstants, mode: Mode) -> Result<Self> {
        Ok(Self {
            engine: BlockEngine::new(constants)?,
            mode,
            first: String::new(),
            second: String::new(),
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(config.board, config.session.mode)
    }

    pub fn constants(&self) -> &BoardConstants {
        self.engine.constants()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn board(&self) -> Option<&Board> {
        self.engine.board()
    }

    pub fn is_drawn(&self) -> bool {
        self.engine.board().is_some()
    }

    pub fn entry(&self, slot: EntrySlot) -> &str {
        match slot {
            EntrySlot::First => &self.first,
            EntrySlot::Second => &self.second,
        }
    }

    /// Captions for the two entry fields.
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self.mode {
            Mode::Add => ("First number", "Second number"),
            Mode::Subtract => ("Larger number", "Smaller number"),
        }
    }

    fn entry_mut(&mut self, slot: EntrySlot) -> Result<&mut String> {
        if self.is_drawn() {
            return Err(RuntimeError::EntriesLocked);
        }
        Ok(match slot {
            EntrySlot::First => &mut self.first,
            EntrySlot::Second => &mut self.second,
        })
    }

    /// Append one typed character; invalid keystrokes leave the entry unchanged.
    pub fn type_key(&mut self, slot: EntrySlot, ch: char) -> Result<()> {
        let constants = *self.constants();
        let entry = self.entry_mut(slot)?;
        validate_keystroke(entry, ch, &constants)?;
        entry.push(ch);
        Ok(())
    }

    /// Replace an entry wholesale (paste), validating every character.
    pub fn set_entry(&mut self, slot: EntrySlot, text: &str) -> Result<()> {
        let constants = *self.constants();
        let entry = self.entry_mut(slot)?;
        let mut next = String::with_capacity(text.len());
        for ch in text.chars() {
            validate_keystroke(&next, ch, &constants)?;
            next.push(ch);
        }
        *entry = next;
        Ok(())
    }

    pub fn backspace(&mut self, slot: EntrySlot) -> Result<()> {
        self.entry_mut(slot)?.pop();
        Ok(())
    }

    /// Whether "Draw Blocks" is enabled.
    pub fn can_draw(&self) -> bool {
        !self.is_drawn()
            && validate_operands(&self.first, &self.second, self.mode, self.constants()).is_ok()
    }

    /// The +/- sign button.
    pub fn toggle_mode(&mut self) -> Result<Mode> {
        if self.is_drawn() {
            return Err(RuntimeError::ModeLocked);
        }
        self.mode = self.mode.toggled();
        debug!("mode switched to {}", self.mode);
        Ok(self.mode)
    }

    pub fn draw_blocks(&mut self) -> Result<TransitionResult> {
        if self.is_drawn() {
            return Err(RuntimeError::EntriesLocked);
        }
        let (first, second) =
            validate_operands(&self.first, &self.second, self.mode, self.constants())?;
        Ok(self.engine.draw_blocks(&first, &second, self.mode)?)
    }

    pub fn place_block(
        &mut self,
        block: BlockId,
        source: ColumnRef,
        target: ColumnRef,
    ) -> Result<TransitionResult> {
        Ok(self.engine.place_block(block, source, target)?)
    }

    pub fn carry(&mut self, column: usize) -> Result<TransitionResult> {
        Ok(self.engine.carry(column)?)
    }

    pub fn borrow(&mut self, column: usize) -> Result<TransitionResult> {
        Ok(self.engine.borrow(column)?)
    }

    /// Start over: empty board and entries, same operator.
    pub fn new_problem(&mut self) -> Result<TransitionResult> {
        let result = self.engine.new_problem()?;
        self.first.clear();
        self.second.clear();
        info!("new problem ({} mode)", self.mode);
        Ok(result)
    }

    /// The final answer once the problem is complete.
    pub fn answer(&self) -> Option<String> {
        self.engine.calc_answer()
    }

    pub fn current_hash(&self) -> Option<String> {
        self.engine.board().map(canonical_hash)
    }

    pub fn current_sequence(&self) -> u64 {
        self.engine.last_sequence()
    }

    /// Everything needed to replay this session.
    pub fn transcript(&self) -> Transcript {
        Transcript {
            constants: *self.constants(),
            commands: self.engine.history().to_vec(),
            expected_answer: self.answer(),
        }
    }
}
