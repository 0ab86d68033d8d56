//! Column domain model.
//!
//! # Invariants
//! - The board has exactly three columns, addressed by `ColumnId`.
//! - Only the entry column uses `locked`; other columns stay unlocked.

use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Maximum number of cards in the entry column.
pub const ENTRY_CAPACITY: usize = 3;
/// Maximum number of cards in the mid column.
pub const MID_CAPACITY: usize = 5;

/// Pipeline stage of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    /// Index 0, new cards land here.
    Entry,
    /// Index 1, cards past the halfway mark.
    Mid,
    /// Index 2, terminal column for fully completed cards.
    Done,
}

impl ColumnId {
    pub const ALL: [ColumnId; 3] = [ColumnId::Entry, ColumnId::Mid, ColumnId::Done];

    /// Position of the column on the board, 0..=2.
    pub fn index(self) -> usize {
        match self {
            Self::Entry => 0,
            Self::Mid => 1,
            Self::Done => 2,
        }
    }

    /// Column at `index`, `None` past the terminal column.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Card capacity, `None` for the unbounded terminal column.
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::Entry => Some(ENTRY_CAPACITY),
            Self::Mid => Some(MID_CAPACITY),
            Self::Done => None,
        }
    }

    /// Whether the add-card form may target this column.
    pub fn accepts_new_cards(self) -> bool {
        self != Self::Done
    }

    /// Header shown for a freshly created column.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Entry => "3 items",
            Self::Mid => "5 items",
            Self::Done => "unlimited",
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Ordered container of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub locked: bool,
}

impl Column {
    /// Creates an empty, unlocked column with the stage's default title.
    pub fn empty(id: ColumnId) -> Self {
        Self {
            title: id.default_title().to_string(),
            cards: Vec::new(),
            locked: false,
        }
    }

    /// Number of cards in the column.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
