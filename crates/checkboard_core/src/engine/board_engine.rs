//! Card lifecycle and column-transition rules.
//!
//! # Responsibility
//! - Create cards from form input and append them to a column.
//! - Toggle checklist items and move cards when their completion ratio
//!   crosses the half-complete threshold.
//! - Keep the entry column lock in sync with board state.
//!
//! # Invariants
//! - One threshold (`completed / total >= 0.5`) drives entry -> mid advance,
//!   the entry lock, and (as its complement) mid -> entry regression.
//! - Rule-driven moves never overfill a capped column; a card that qualifies
//!   for a full column waits where it is. Direct adds are gated by callers
//!   through `can_add_card`.
//! - The terminal column only receives cards through moves, so every card
//!   there carries a completion date.
//! - Every entry card's `locked` equals the entry column's `locked`; cards in
//!   other columns are never locked.
//! - No operation panics on bad input; addressing errors are returned.

use crate::engine::prompter::{request_trimmed_reason, Prompter};
use crate::model::board::BoardSnapshot;
use crate::model::card::{is_half_complete, Card, CardId, CardValidationError};
use crate::model::column::{Column, ColumnId};
use crate::model::draft::CardDraft;
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Error for engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Card input failed validation; board state is unchanged.
    Validation(CardValidationError),
    /// Column index is not 0, 1 or 2.
    ColumnOutOfRange(usize),
    CardNotFound {
        column: ColumnId,
        card: usize,
    },
    ItemNotFound {
        column: ColumnId,
        card: usize,
        item: usize,
    },
    /// Target column is at capacity.
    ColumnFull(ColumnId),
    /// Column only receives cards through moves.
    AddNotAllowed(ColumnId),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ColumnOutOfRange(index) => write!(f, "column index out of range: {index}"),
            Self::CardNotFound { column, card } => {
                write!(f, "card {card} not found in {column} column")
            }
            Self::ItemNotFound { column, card, item } => {
                write!(f, "item {item} not found on card {card} in {column} column")
            }
            Self::ColumnFull(column) => write!(f, "{column} column is full"),
            Self::AddNotAllowed(column) => {
                write!(f, "cards cannot be added to the {column} column directly")
            }
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CardValidationError> for BoardError {
    fn from(value: CardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl TryFrom<usize> for ColumnId {
    type Error = BoardError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        ColumnId::from_index(index).ok_or(BoardError::ColumnOutOfRange(index))
    }
}

/// Result of an item toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Card is locked; nothing changed.
    Ignored,
    /// Item flipped; the card stays in its column.
    Updated,
    /// Item flipped and the card moved to `to`.
    Moved {
        card_id: CardId,
        from: ColumnId,
        to: ColumnId,
    },
    /// Item flipped; the card qualifies for `target` but that column is full.
    Waiting { target: ColumnId },
    /// Regression needed a reason and none was given; nothing changed.
    MoveAborted,
}

impl ToggleOutcome {
    /// Whether board state differs from before the toggle.
    pub fn changed_state(&self) -> bool {
        !matches!(self, Self::Ignored | Self::MoveAborted)
    }
}

/// Owned board state plus the add-card draft.
#[derive(Debug, Clone, Default)]
pub struct BoardEngine {
    board: BoardSnapshot,
    draft: CardDraft,
}

impl BoardEngine {
    /// Creates an engine with three empty columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that takes over `snapshot` wholesale.
    ///
    /// Lock flags are recomputed so hand-edited snapshots cannot leave entry
    /// cards out of sync with their column. For snapshots produced by this
    /// engine the recomputation is a no-op.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut engine = Self {
            board: snapshot,
            draft: CardDraft::default(),
        };
        engine.check_lock_state();
        engine
    }

    /// Current board state, ready to persist.
    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Consumes the engine and returns its board.
    pub fn into_snapshot(self) -> BoardSnapshot {
        self.board
    }

    /// All three columns in board order.
    pub fn columns(&self) -> &[Column; 3] {
        &self.board.columns
    }

    /// One column by stage.
    pub fn column(&self, id: ColumnId) -> &Column {
        self.board.column(id)
    }

    /// Card at `card_index` in `column`, if any.
    pub fn card(&self, column: ColumnId, card_index: usize) -> Option<&Card> {
        self.column(column).cards.get(card_index)
    }

    /// Locates a card by id as `(column, index)`.
    pub fn find_card(&self, id: CardId) -> Option<(ColumnId, usize)> {
        ColumnId::ALL.into_iter().find_map(|column| {
            self.column(column)
                .cards
                .iter()
                .position(|card| card.id == id)
                .map(|index| (column, index))
        })
    }

    /// Total cards across all columns.
    pub fn card_count(&self) -> usize {
        self.board.card_count()
    }

    /// Pending add-card form input.
    pub fn draft(&self) -> &CardDraft {
        &self.draft
    }

    /// Mutable draft for form edits; not part of the snapshot.
    pub fn draft_mut(&mut self) -> &mut CardDraft {
        &mut self.draft
    }

    /// Whether `column` accepts a new card.
    ///
    /// Always false for the terminal column.
    pub fn can_add_card(&self, column: ColumnId) -> bool {
        column.accepts_new_cards() && !self.is_full(column)
    }

    /// Whether the add-card affordance should be disabled.
    ///
    /// Same predicate as the entry column lock.
    pub fn is_add_button_disabled(&self) -> bool {
        self.lock_predicate()
    }

    /// Creates a card from raw form input and appends it to `column`.
    ///
    /// Capacity is not checked here; callers gate the form with
    /// `can_add_card`.
    ///
    /// # Errors
    /// - `AddNotAllowed` for the terminal column.
    /// - `Validation` when the non-blank item count is outside 3..=5 or the
    ///   title is blank. Board and draft are unchanged.
    pub fn add_card<I, T>(
        &mut self,
        column: ColumnId,
        title: &str,
        raw_items: I,
    ) -> BoardResult<Card>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !column.accepts_new_cards() {
            warn!(
                "event=card_add module=engine status=rejected column={column} error_code=add_not_allowed"
            );
            return Err(BoardError::AddNotAllowed(column));
        }

        let card = match Card::from_texts(title, raw_items) {
            Ok(card) => card,
            Err(err) => {
                warn!("event=card_add module=engine status=rejected column={column} error={err}");
                return Err(err.into());
            }
        };

        self.board.columns[column.index()].cards.push(card.clone());
        self.draft.clear();
        info!(
            "event=card_add module=engine status=ok column={column} card_id={} items={}",
            card.id,
            card.items.len()
        );
        self.check_lock_state();
        Ok(self.card_by_id(card.id).cloned().unwrap_or(card))
    }

    /// Submits the engine-held draft to `column`.
    ///
    /// The draft is cleared on success and kept for correction on failure.
    pub fn submit_draft(&mut self, column: ColumnId) -> BoardResult<Card> {
        let draft = self.draft.clone();
        self.add_card(column, &draft.title, &draft.items)
    }

    /// Flips one checklist item and applies the resulting column transition.
    ///
    /// A regression to the entry column asks `prompter` for a reason before
    /// anything is mutated; without a reason the whole toggle is dropped.
    /// Only the first accepted reason is recorded on a card.
    ///
    /// # Errors
    /// - `CardNotFound` / `ItemNotFound` for addresses outside the board.
    pub fn toggle_item<P: Prompter + ?Sized>(
        &mut self,
        column: ColumnId,
        card_index: usize,
        item_index: usize,
        prompter: &mut P,
    ) -> BoardResult<ToggleOutcome> {
        let card = self.card(column, card_index).ok_or(BoardError::CardNotFound {
            column,
            card: card_index,
        })?;
        let item = card.items.get(item_index).ok_or(BoardError::ItemNotFound {
            column,
            card: card_index,
            item: item_index,
        })?;

        if card.locked {
            debug!("event=item_toggle module=engine status=ignored reason=locked column={column}");
            return Ok(ToggleOutcome::Ignored);
        }

        let completed_after = if item.completed {
            card.completed_count() - 1
        } else {
            card.completed_count() + 1
        };
        let target = completion_target(column, completed_after, card.items.len())
            .map(|target| (target, self.is_full(target)));

        let reason = match target {
            Some((ColumnId::Entry, false)) => match request_trimmed_reason(prompter) {
                Some(reason) => Some(reason),
                None => {
                    info!("event=card_regress module=engine status=aborted column={column}");
                    return Ok(ToggleOutcome::MoveAborted);
                }
            },
            _ => None,
        };

        let card = &mut self.board.columns[column.index()].cards[card_index];
        let item = &mut card.items[item_index];
        item.completed = !item.completed;
        if let Some(reason) = reason {
            if card.reason_for_move.is_empty() {
                card.reason_for_move = reason;
            }
        }

        let outcome = match target {
            None => ToggleOutcome::Updated,
            Some((target, true)) => {
                debug!("event=card_move module=engine status=waiting from={column} to={target}");
                ToggleOutcome::Waiting { target }
            }
            Some((target, false)) => {
                let card_id = self.move_card(column, target, card_index)?;
                ToggleOutcome::Moved {
                    card_id,
                    from: column,
                    to: target,
                }
            }
        };

        self.check_lock_state();
        Ok(outcome)
    }

    /// Moves one card to the end of another column.
    ///
    /// Entering the terminal column stamps `completed_date`; entering any
    /// other column clears it. Moving a card within its own column leaves
    /// the board untouched.
    ///
    /// # Errors
    /// - `CardNotFound` when `card_index` is outside `from`.
    /// - `ColumnFull` when `to` is at capacity.
    pub fn move_card(
        &mut self,
        from: ColumnId,
        to: ColumnId,
        card_index: usize,
    ) -> BoardResult<CardId> {
        if card_index >= self.column(from).len() {
            return Err(BoardError::CardNotFound {
                column: from,
                card: card_index,
            });
        }
        if from == to {
            let card_id = self.column(from).cards[card_index].id;
            debug!("event=card_move module=engine status=skipped card_id={card_id} column={from}");
            return Ok(card_id);
        }
        if self.is_full(to) {
            return Err(BoardError::ColumnFull(to));
        }

        let mut card = self.board.columns[from.index()].cards.remove(card_index);
        card.completed_date = (to == ColumnId::Done).then(Utc::now);
        let card_id = card.id;
        self.board.columns[to.index()].cards.push(card);

        info!("event=card_move module=engine status=ok card_id={card_id} from={from} to={to}");
        self.check_lock_state();
        Ok(card_id)
    }

    /// Recomputes the entry column lock and mirrors it onto its cards.
    pub fn check_lock_state(&mut self) {
        let locked = self.lock_predicate();
        let [entry, mid, done] = &mut self.board.columns;

        if entry.locked != locked {
            info!("event=lock_state module=engine status=ok locked={locked}");
        }
        entry.locked = locked;
        for card in &mut entry.cards {
            card.locked = locked;
        }

        for column in [mid, done] {
            column.locked = false;
            for card in &mut column.cards {
                card.locked = false;
            }
        }
    }

    fn lock_predicate(&self) -> bool {
        self.is_full(ColumnId::Mid)
            && self
                .column(ColumnId::Entry)
                .cards
                .iter()
                .any(Card::is_half_complete)
    }

    fn is_full(&self, column: ColumnId) -> bool {
        column
            .capacity()
            .is_some_and(|capacity| self.column(column).len() >= capacity)
    }

    fn card_by_id(&self, id: CardId) -> Option<&Card> {
        self.find_card(id)
            .and_then(|(column, index)| self.card(column, index))
    }
}

/// Column a card should move to once it has `completed` of `total` items.
///
/// Arms are evaluated in order; at most one transition fires per toggle.
fn completion_target(column: ColumnId, completed: usize, total: usize) -> Option<ColumnId> {
    match column {
        ColumnId::Entry if is_half_complete(completed, total) => Some(ColumnId::Mid),
        ColumnId::Mid if !is_half_complete(completed, total) => Some(ColumnId::Entry),
        ColumnId::Entry | ColumnId::Mid if completed == total => Some(ColumnId::Done),
        _ => None,
    }
}
