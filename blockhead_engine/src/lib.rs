#![forbid(unsafe_code)]

//! BlockHead place-value engine.
//!
//! Stacks of unit blocks move between columns, combine on a carry and
//! split on a borrow, teaching multi-digit addition and subtraction.
//! The engine is synchronous and timing-free; presentation layers
//! animate from the events each command returns.

/// Bumped whenever transition behaviour changes. Part of the board fingerprint.
pub const ENGINE_VERSION: u32 = 1;

pub mod arithmetic;
pub mod domain;
pub mod error;
pub mod events;
pub mod state;
pub mod transitions;
pub mod invariants;
pub mod hashing;
pub mod engine;
