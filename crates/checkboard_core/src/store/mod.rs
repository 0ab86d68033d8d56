//! Snapshot persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the board service persists through.
//! - Keep SQL and JSON encoding details out of the engine.
//!
//! # Invariants
//! - The whole board is written as one blob; last write wins.
//! - Read paths reject invalid persisted snapshots instead of masking them.

pub mod snapshot_store;
