//! Replay orchestrator: rebuild a board from a transcript.
//!
//! Delegates all arithmetic to the engine. No shortcuts, no cached
//! boards.

use blockhead_engine::domain::Board;
use blockhead_engine::engine::BlockEngine;
use blockhead_engine::hashing::canonical_hash;
use log::debug;

use crate::error::{Result, RuntimeError};
use crate::transcript::Transcript;

/// Fingerprint reported when the transcript leaves no problem drawn.
pub const NO_BOARD: &str = "none";

/// Rebuild the board from a transcript.
///
/// 1. Create a fresh engine with the transcript's constants
/// 2. Apply each command in order
/// 3. Return (final_board, fingerprint)
pub fn rebuild_board(transcript: &Transcript) -> Result<(Option<Board>, String)> {
    let mut engine = BlockEngine::new(transcript.constants)?;
    let board = engine.replay(&transcript.commands)?.cloned();
    let hash = fingerprint(board.as_ref());
    debug!(
        "replayed {} commands -> {}",
        transcript.commands.len(),
        hash
    );
    Ok((board, hash))
}

pub fn fingerprint(board: Option<&Board>) -> String {
    board.map_or_else(|| NO_BOARD.to_string(), canonical_hash)
}

/// Replay twice and require identical fingerprints.
pub fn verify_determinism(transcript: &Transcript) -> Result<String> {
    let (_, first) = rebuild_board(transcript)?;
    let (_, second) = rebuild_board(transcript)?;

    if first != second {
        return Err(RuntimeError::NonDeterministic { first, second });
    }
    Ok(first)
}
