/// BlockHead Engine: Engine
///
/// Top-level orchestrator. Delegates mutation to transitions,
/// validates via invariants.
///
/// Strict sequence enforcement; a failed command consumes no sequence
/// number and leaves the board untouched.

use log::warn;

use crate::domain::{BlockId, Board, BoardConstants, ColumnRef, Mode, TransitionResult};
use crate::error::{EngineError, Result};
use crate::events::{Command, CommandEnvelope, SCHEMA_VERSION};
use crate::invariants::validate_invariants;
use crate::transitions::apply_command;

/// Stateful engine wrapping the pure transition layer.
#[derive(Debug, Clone)]
pub struct BlockEngine {
    constants: BoardConstants,
    board: Option<Board>,
    last_sequence: u64,
    history: Vec<CommandEnvelope>,
}

impl Default for BlockEngine {
    fn default() -> Self {
        Self {
            constants: BoardConstants::default(),
            board: None,
            last_sequence: 0,
            history: Vec::new(),
        }
    }
}

impl BlockEngine {
    /// Create an engine with no problem drawn.
    pub fn new(constants: BoardConstants) -> Result<Self> {
        constants.validate()?;
        Ok(Self {
            constants,
            ..Self::default()
        })
    }

    pub fn constants(&self) -> &BoardConstants {
        &self.constants
    }

    /// Current board, if a problem is drawn.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Every successfully applied envelope, in order.
    pub fn history(&self) -> &[CommandEnvelope] {
        &self.history
    }

    pub fn carry_count(&self) -> u32 {
        self.board.as_ref().map_or(0, |b| b.carry_count)
    }

    /// The final answer once the problem is complete.
    pub fn calc_answer(&self) -> Option<String> {
        self.board.as_ref().and_then(Board::calc_answer)
    }

    /// Apply a single envelope:
    ///   1. Validate schema version (must be 1)
    ///   2. Validate sequence (strictly increasing, no gaps)
    ///   3. Delegate to transitions::apply_command
    ///   4. Validate invariants on the new board
    ///   5. Store and return
    pub fn apply(&mut self, envelope: &CommandEnvelope) -> Result<TransitionResult> {
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(EngineError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                got: envelope.schema_version,
            });
        }

        let expected = self.last_sequence + 1;
        if envelope.sequence != expected {
            return Err(EngineError::SequenceViolation {
                expected,
                got: envelope.sequence,
            });
        }

        let (next, result) = apply_command(&self.constants, self.board.as_ref(), envelope)
            .inspect_err(|e| warn!("{} #{} failed: {}", envelope.command.name(), envelope.sequence, e))?;

        if let Some(board) = &next {
            validate_invariants(board);
        }
        self.board = next;
        self.last_sequence = envelope.sequence;
        self.history.push(envelope.clone());

        Ok(result)
    }

    /// Stamp `command` with the next sequence number and apply it.
    pub fn submit(&mut self, command: Command) -> Result<TransitionResult> {
        let envelope = CommandEnvelope::new(self.last_sequence + 1, command);
        self.apply(&envelope)
    }

    pub fn draw_blocks(&mut self, first: &str, second: &str, mode: Mode) -> Result<TransitionResult> {
        self.submit(Command::DrawBlocks {
            first: first.to_string(),
            second: second.to_string(),
            mode,
        })
    }

    pub fn place_block(
        &mut self,
        block: BlockId,
        source: ColumnRef,
        target: ColumnRef,
    ) -> Result<TransitionResult> {
        self.submit(Command::PlaceBlock {
            block,
            source,
            target,
        })
    }

    pub fn carry(&mut self, column: usize) -> Result<TransitionResult> {
        self.submit(Command::Carry { column })
    }

    pub fn borrow(&mut self, column: usize) -> Result<TransitionResult> {
        self.submit(Command::Borrow { column })
    }

    /// Discard the board ("New").
    pub fn new_problem(&mut self) -> Result<TransitionResult> {
        self.submit(Command::New)
    }

    /// Forget board, sequence and history.
    pub fn reset(&mut self) {
        self.board = None;
        self.last_sequence = 0;
        self.history.clear();
    }

    /// Reset and re-apply `envelopes` in order.
    pub fn replay(&mut self, envelopes: &[CommandEnvelope]) -> Result<Option<&Board>> {
        self.reset();
        for envelope in envelopes {
            self.apply(envelope)?;
        }
        Ok(self.board())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_constants() {
        let err = BlockEngine::new(BoardConstants { base: 1, column_count: 3 }).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedBase(1));
    }

    #[test]
    fn test_sequence_must_not_skip() {
        let mut engine = BlockEngine::default();
        let env = CommandEnvelope::new(2, Command::New);
        assert_eq!(
            engine.apply(&env).unwrap_err(),
            EngineError::SequenceViolation { expected: 1, got: 2 }
        );
    }

    #[test]
    fn test_schema_version_is_enforced() {
        let mut engine = BlockEngine::default();
        let mut env = CommandEnvelope::new(1, Command::New);
        env.schema_version = 2;
        assert!(matches!(
            engine.apply(&env),
            Err(EngineError::SchemaVersionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_failed_command_consumes_no_sequence() {
        let mut engine = BlockEngine::default();
        assert_eq!(engine.carry(0).unwrap_err(), EngineError::NoProblem);
        assert_eq!(engine.last_sequence(), 0);
        assert!(engine.history().is_empty());

        engine.draw_blocks("5", "6", Mode::Add).unwrap();
        assert_eq!(engine.last_sequence(), 1);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_new_problem_clears_board_but_keeps_history() {
        let mut engine = BlockEngine::default();
        engine.draw_blocks("5", "6", Mode::Add).unwrap();
        assert!(engine.board().is_some());
        engine.new_problem().unwrap();
        assert!(engine.board().is_none());
        assert_eq!(engine.carry_count(), 0);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_replay_rebuilds_same_board() {
        let mut engine = BlockEngine::default();
        engine.draw_blocks("58", "7", Mode::Add).unwrap();
        engine
            .place_block(
                BlockId(1),
                ColumnRef::new(crate::domain::NumberRole::First, 0),
                ColumnRef::answer(0),
            )
            .unwrap();
        let before = engine.board().cloned();
        let history = engine.history().to_vec();

        let mut other = BlockEngine::default();
        let rebuilt = other.replay(&history).unwrap().cloned();
        assert_eq!(rebuilt, before);
        assert_eq!(other.last_sequence(), 2);
    }
}
