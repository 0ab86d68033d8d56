//! Board domain model: checklist cards grouped into three columns.
//!
//! # Responsibility
//! - Define the canonical data structures used by the board engine.
//! - Own construction-time validation so invalid cards never exist.
//!
//! # Invariants
//! - Every card carries 3..=5 checklist items for its whole lifetime.
//! - A board snapshot always holds exactly three columns.

pub mod board;
pub mod card;
pub mod column;
pub mod draft;
