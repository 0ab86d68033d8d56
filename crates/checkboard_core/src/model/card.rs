//! Card domain model.
//!
//! # Responsibility
//! - Define checklist cards and their items.
//! - Validate item count, item text and identity at every construction path,
//!   including deserialization of persisted snapshots.
//!
//! # Invariants
//! - `items.len()` stays within `MIN_ITEMS..=MAX_ITEMS`; items are never added
//!   or removed after creation.
//! - `id` is never nil and is not reused for another card.
//! - `completed_date` is set only while the card sits in the terminal column.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimum number of checklist items on a card.
pub const MIN_ITEMS: usize = 3;
/// Maximum number of checklist items on a card.
pub const MAX_ITEMS: usize = 5;

const COMPLETED_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Stable identifier for a card, kept across column moves.
pub type CardId = Uuid;

/// Validation error for card construction and deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    /// Non-blank item count is outside `MIN_ITEMS..=MAX_ITEMS`.
    ItemCount { count: usize },
    /// Title is empty after trimming.
    EmptyTitle,
    /// Item at `index` has blank text.
    BlankItem { index: usize },
    /// Card id is the nil UUID.
    NilId,
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemCount { count } => write!(
                f,
                "card must have between {MIN_ITEMS} and {MAX_ITEMS} items, got {count}"
            ),
            Self::EmptyTitle => write!(f, "card title cannot be empty"),
            Self::BlankItem { index } => write!(f, "item {index} has blank text"),
            Self::NilId => write!(f, "card id cannot be nil"),
        }
    }
}

impl Error for CardValidationError {}

/// One checklist entry on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    /// Creates an unchecked item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// A titled checklist living in exactly one board column.
///
/// Serialized with camelCase field names so snapshots keep the
/// `completedDate` / `reasonForMove` wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CardRecord")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub items: Vec<ChecklistItem>,
    /// Mirrors the entry column lock while the card sits there.
    pub locked: bool,
    /// Stamped when the card enters the terminal column.
    pub completed_date: Option<DateTime<Utc>>,
    /// Empty until a mid -> entry regression records a reason.
    pub reason_for_move: String,
}

/// Unvalidated wire shape.
///
/// Older snapshots carry no `id` and store `completedDate` as local
/// `dd.mm.yyyy, HH:MM:SS` text instead of RFC 3339.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    #[serde(default = "Uuid::new_v4")]
    id: CardId,
    title: String,
    items: Vec<ChecklistItem>,
    #[serde(default)]
    locked: bool,
    #[serde(default, deserialize_with = "deserialize_completed_date")]
    completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    reason_for_move: String,
}

fn deserialize_completed_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_completed_date(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("unrecognized completedDate `{raw}`")))
}

fn parse_completed_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim(), COMPLETED_DATE_FORMAT)
        .ok()?
        .and_local_timezone(Local)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
}

impl TryFrom<CardRecord> for Card {
    type Error = CardValidationError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let card = Self {
            id: record.id,
            title: record.title,
            items: record.items,
            locked: record.locked,
            completed_date: record.completed_date,
            reason_for_move: record.reason_for_move,
        };
        card.validate()?;
        Ok(card)
    }
}

impl Card {
    /// Creates a card from raw form texts with a generated id.
    ///
    /// Blank texts are dropped and the rest trimmed, so optional form slots
    /// left empty do not count towards the item total.
    ///
    /// # Errors
    /// - `ItemCount` when fewer than 3 or more than 5 texts remain.
    /// - `EmptyTitle` when the trimmed title is empty.
    pub fn from_texts<I, T>(title: &str, raw_items: I) -> Result<Self, CardValidationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let items = raw_items
            .into_iter()
            .filter_map(|text| {
                let trimmed = text.as_ref().trim();
                (!trimmed.is_empty()).then(|| ChecklistItem::new(trimmed))
            })
            .collect();
        Self::with_id(Uuid::new_v4(), title.trim(), items)
    }

    /// Creates a card with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: CardId,
        title: impl Into<String>,
        items: Vec<ChecklistItem>,
    ) -> Result<Self, CardValidationError> {
        let card = Self {
            id,
            title: title.into(),
            items,
            locked: false,
            completed_date: None,
            reason_for_move: String::new(),
        };
        card.validate()?;
        Ok(card)
    }

    /// Checks card-level invariants.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.id.is_nil() {
            return Err(CardValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(CardValidationError::EmptyTitle);
        }
        let count = self.items.len();
        if !(MIN_ITEMS..=MAX_ITEMS).contains(&count) {
            return Err(CardValidationError::ItemCount { count });
        }
        if let Some(index) = self.items.iter().position(|item| item.text.trim().is_empty()) {
            return Err(CardValidationError::BlankItem { index });
        }
        Ok(())
    }

    /// Number of checked items.
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Completed share in `0.0..=1.0`, for display only.
    ///
    /// Threshold decisions use the integer helpers below.
    pub fn completion_ratio(&self) -> f64 {
        self.completed_count() as f64 / self.items.len() as f64
    }

    /// Whether at least half of the items are completed (`ratio >= 0.5`).
    pub fn is_half_complete(&self) -> bool {
        is_half_complete(self.completed_count(), self.items.len())
    }

    /// Whether every item is checked.
    pub fn is_fully_complete(&self) -> bool {
        self.completed_count() == self.items.len()
    }

    /// Completion timestamp rendered in local time, if set.
    pub fn completed_date_display(&self) -> Option<String> {
        self.completed_date.map(|date| {
            date.with_timezone(&Local)
                .format(COMPLETED_DATE_FORMAT)
                .to_string()
        })
    }

    /// Whether a regression reason has been recorded.
    pub fn has_reason_for_move(&self) -> bool {
        !self.reason_for_move.is_empty()
    }
}

/// Half-complete threshold expressed without floating point.
pub(crate) fn is_half_complete(completed: usize, total: usize) -> bool {
    completed * 2 >= total
}
