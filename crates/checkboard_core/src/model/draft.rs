//! Pending add-card input.
//!
//! The draft mirrors the add-card form: one title and five item slots, the
//! last two optional. It is not part of the persisted snapshot.

use crate::model::card::MAX_ITEMS;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub items: [String; MAX_ITEMS],
}

impl CardDraft {
    /// Sets item text at `slot`. Returns `false` when the slot does not exist.
    pub fn set_item(&mut self, slot: usize, text: impl Into<String>) -> bool {
        match self.items.get_mut(slot) {
            Some(item) => {
                *item = text.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.items.iter().all(String::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::CardDraft;

    #[test]
    fn set_item_rejects_out_of_range_slot() {
        let mut draft = CardDraft::default();
        assert!(draft.set_item(4, "last"));
        assert!(!draft.set_item(5, "overflow"));
        assert_eq!(draft.items[4], "last");
    }

    #[test]
    fn clear_resets_every_field() {
        let mut draft = CardDraft {
            title: "title".to_string(),
            ..CardDraft::default()
        };
        draft.set_item(0, "a");
        draft.clear();
        assert!(draft.is_empty());
    }
}
