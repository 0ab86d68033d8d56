//! Core domain logic for the checkboard three-column checklist board.
//! This crate is the single source of truth for card lifecycle invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use engine::board_engine::{BoardEngine, BoardError, BoardResult, ToggleOutcome};
pub use engine::prompter::Prompter;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{BoardSnapshot, SnapshotValidationError};
pub use model::card::{
    Card, CardId, CardValidationError, ChecklistItem, MAX_ITEMS, MIN_ITEMS,
};
pub use model::column::{Column, ColumnId, ENTRY_CAPACITY, MID_CAPACITY};
pub use model::draft::CardDraft;
pub use service::board_service::{BoardService, ServiceError, ServiceResult};
pub use store::snapshot_store::{
    BoardStore, MemoryBoardStore, SqliteBoardStore, StoreError, StoreResult,
    DEFAULT_SNAPSHOT_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
