//! Board use-case service.
//!
//! # Responsibility
//! - Load the persisted snapshot once at startup.
//! - Delegate every operation to `BoardEngine` and save the full snapshot
//!   after each call that changed state.
//!
//! # Invariants
//! - A failed save never rolls back or alters engine state.
//! - Calls that leave the board unchanged (rejected input, locked toggles,
//!   aborted regressions) do not write to the store.

use crate::engine::board_engine::{BoardEngine, BoardError, ToggleOutcome};
use crate::engine::prompter::Prompter;
use crate::model::board::BoardSnapshot;
use crate::model::card::{Card, CardId};
use crate::model::column::ColumnId;
use crate::model::draft::CardDraft;
use crate::store::snapshot_store::{BoardStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for board use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Engine rejected the operation; state is unchanged.
    Board(BoardError),
    /// Stored snapshot could not be read at startup.
    Load(StoreError),
    /// Operation succeeded in memory but the snapshot was not saved.
    Persist(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board(err) => write!(f, "{err}"),
            Self::Load(err) => write!(f, "failed to load board: {err}"),
            Self::Persist(err) => write!(f, "failed to save board: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            Self::Load(err) | Self::Persist(err) => Some(err),
        }
    }
}

impl From<BoardError> for ServiceError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

/// Board facade owning the engine and its collaborators.
pub struct BoardService<S: BoardStore, P: Prompter> {
    engine: BoardEngine,
    store: S,
    prompter: P,
}

impl<S: BoardStore, P: Prompter> BoardService<S, P> {
    /// Loads the stored snapshot, or starts from an empty board.
    ///
    /// # Errors
    /// - `Load` when the stored snapshot cannot be read or is invalid.
    pub fn open(store: S, prompter: P) -> ServiceResult<Self> {
        let snapshot = store.load().map_err(|err| {
            error!("event=board_load module=service status=error error={err}");
            ServiceError::Load(err)
        })?;

        let engine = match snapshot {
            Some(snapshot) => {
                info!(
                    "event=board_load module=service status=ok source=store cards={}",
                    snapshot.card_count()
                );
                BoardEngine::from_snapshot(snapshot)
            }
            None => {
                info!("event=board_load module=service status=ok source=default cards=0");
                BoardEngine::new()
            }
        };

        Ok(Self {
            engine,
            store,
            prompter,
        })
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        self.engine.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Draft edits are not persisted.
    pub fn draft_mut(&mut self) -> &mut CardDraft {
        self.engine.draft_mut()
    }

    pub fn add_card<I, T>(
        &mut self,
        column: ColumnId,
        title: &str,
        raw_items: I,
    ) -> ServiceResult<Card>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let card = self.engine.add_card(column, title, raw_items)?;
        self.persist()?;
        Ok(card)
    }

    pub fn submit_draft(&mut self, column: ColumnId) -> ServiceResult<Card> {
        let card = self.engine.submit_draft(column)?;
        self.persist()?;
        Ok(card)
    }

    /// Toggles one item, asking the owned prompter when a regression needs a
    /// reason.
    pub fn toggle_item(
        &mut self,
        column: ColumnId,
        card_index: usize,
        item_index: usize,
    ) -> ServiceResult<ToggleOutcome> {
        let outcome = self
            .engine
            .toggle_item(column, card_index, item_index, &mut self.prompter)?;
        if outcome.changed_state() {
            self.persist()?;
        }
        Ok(outcome)
    }

    pub fn move_card(
        &mut self,
        from: ColumnId,
        to: ColumnId,
        card_index: usize,
    ) -> ServiceResult<CardId> {
        let card_id = self.engine.move_card(from, to, card_index)?;
        if from != to {
            self.persist()?;
        }
        Ok(card_id)
    }

    /// Replaces the board with three empty columns and saves it.
    pub fn reset(&mut self) -> ServiceResult<()> {
        self.engine = BoardEngine::new();
        info!("event=board_reset module=service status=ok");
        self.persist()
    }

    fn persist(&self) -> ServiceResult<()> {
        self.store.save(self.engine.snapshot()).map_err(|err| {
            error!(
                "event=board_save module=service status=error error_code=save_failed error={err}"
            );
            ServiceError::Persist(err)
        })
    }
}
