//! Board snapshot: the persistence unit.
//!
//! # Responsibility
//! - Hold the complete column list as one serializable value.
//! - Reject persisted shapes the engine cannot operate on.
//!
//! # Invariants
//! - Exactly three columns, in `ColumnId` order (enforced by the array type).
//! - Card ids are unique across the whole board.

use crate::model::card::{Card, CardId};
use crate::model::column::{Column, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for snapshots that deserialize but break board-level invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    DuplicateCardId(CardId),
}

impl Display for SnapshotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCardId(id) => write!(f, "duplicate card id in snapshot: {id}"),
        }
    }
}

impl Error for SnapshotValidationError {}

/// Full column list, serialized as `{ "columns": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: [Column; 3],
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            columns: ColumnId::ALL.map(Column::empty),
        }
    }
}

impl BoardSnapshot {
    /// One column by stage.
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    /// Total number of cards across all columns.
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Every card with its column, in board order.
    pub fn cards(&self) -> impl Iterator<Item = (ColumnId, &Card)> {
        ColumnId::ALL
            .into_iter()
            .flat_map(move |id| self.column(id).cards.iter().map(move |card| (id, card)))
    }

    /// Checks that no card id appears twice on the board.
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        let mut seen = HashSet::new();
        for (_, card) in self.cards() {
            if !seen.insert(card.id) {
                return Err(SnapshotValidationError::DuplicateCardId(card.id));
            }
        }
        Ok(())
    }
}
