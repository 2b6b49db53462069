#![forbid(unsafe_code)]

//! BlockHead runtime.
//!
//! Wraps the engine with entry validation, session handling, TOML
//! configuration, transcript persistence, replay and board diffs.
//!
//! No arithmetic lives here; all transitions and invariants are
//! delegated to the engine.

pub mod error;
pub mod input;
pub mod config;
pub mod session;
pub mod transcript;
pub mod replay;
pub mod diff;
