//! Board state machine.
//!
//! # Responsibility
//! - Own column/card state and the pending add-card draft.
//! - Enforce add, move and lock rules after every mutation.
//!
//! # Invariants
//! - The engine is the only writer of board state.
//! - Persistence is not performed here; callers save `snapshot()` after
//!   each mutating call (see `service::board_service`).

pub mod board_engine;
pub mod prompter;
