use checkboard_core::{BoardEngine, BoardError, CardValidationError, ColumnId, ToggleOutcome};
use chrono::Utc;
use std::cell::Cell;

fn no_reason() -> impl FnMut() -> Option<String> {
    || None
}

fn add(engine: &mut BoardEngine, column: ColumnId, item_count: usize) {
    let texts = ["a", "b", "c", "d", "e"];
    engine
        .add_card(column, "card", &texts[..item_count])
        .unwrap();
}

fn toggle(engine: &mut BoardEngine, column: ColumnId, card: usize, item: usize) -> ToggleOutcome {
    engine
        .toggle_item(column, card, item, &mut no_reason())
        .unwrap()
}

/// Adds a card to the entry column and toggles it past halfway into mid.
fn add_to_mid(engine: &mut BoardEngine, item_count: usize) {
    add(engine, ColumnId::Entry, item_count);
    let index = engine.column(ColumnId::Entry).len() - 1;
    let needed = item_count.div_ceil(2);
    for item in 0..needed {
        toggle(engine, ColumnId::Entry, index, item);
    }
}

/// Re-checks item 0 of the only entry card so it advances again.
fn add_to_mid_from_entry(engine: &mut BoardEngine) {
    let outcome = toggle(engine, ColumnId::Entry, 0, 0);
    assert!(matches!(outcome, ToggleOutcome::Moved { to: ColumnId::Mid, .. }));
}

#[test]
fn adding_a_card_then_crossing_half_moves_it_to_mid() {
    let mut engine = BoardEngine::new();
    let card = engine
        .add_card(ColumnId::Entry, "chores", ["a", "b", "c"])
        .unwrap();
    assert_eq!(card.items.len(), 3);
    assert!(card.items.iter().all(|item| !item.completed));
    assert_eq!(engine.column(ColumnId::Entry).len(), 1);

    assert_eq!(toggle(&mut engine, ColumnId::Entry, 0, 0), ToggleOutcome::Updated);
    assert_eq!(
        toggle(&mut engine, ColumnId::Entry, 0, 1),
        ToggleOutcome::Moved {
            card_id: card.id,
            from: ColumnId::Entry,
            to: ColumnId::Mid,
        }
    );

    assert!(engine.column(ColumnId::Entry).is_empty());
    assert_eq!(engine.column(ColumnId::Mid).len(), 1);
    let moved = engine.card(ColumnId::Mid, 0).unwrap();
    assert_eq!(moved.id, card.id);
    assert_eq!(moved.completed_count(), 2);
    assert_eq!(moved.completed_date, None);
}

#[test]
fn completing_every_item_in_mid_moves_card_to_done_with_date() {
    let mut engine = BoardEngine::new();
    add(&mut engine, ColumnId::Entry, 5);
    for item in 0..3 {
        toggle(&mut engine, ColumnId::Entry, 0, item);
    }
    assert_eq!(engine.column(ColumnId::Mid).len(), 1);

    assert_eq!(toggle(&mut engine, ColumnId::Mid, 0, 3), ToggleOutcome::Updated);
    let before = Utc::now();
    let outcome = toggle(&mut engine, ColumnId::Mid, 0, 4);
    let after = Utc::now();

    assert!(matches!(
        outcome,
        ToggleOutcome::Moved {
            from: ColumnId::Mid,
            to: ColumnId::Done,
            ..
        }
    ));
    let done = engine.card(ColumnId::Done, 0).unwrap();
    assert!(done.is_fully_complete());
    let stamped = done.completed_date.expect("done card should be stamped");
    assert!(before <= stamped && stamped <= after);
    assert!(done.completed_date_display().is_some());
}

#[test]
fn regression_without_reason_leaves_board_untouched() {
    let mut engine = BoardEngine::new();
    add_to_mid(&mut engine, 3);
    let before = engine.snapshot().clone();

    let mut cancel = || None::<String>;
    let outcome = engine
        .toggle_item(ColumnId::Mid, 0, 0, &mut cancel)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::MoveAborted);
    assert_eq!(engine.snapshot(), &before);

    let mut blank = || Some("   ".to_string());
    let outcome = engine
        .toggle_item(ColumnId::Mid, 0, 0, &mut blank)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::MoveAborted);
    assert_eq!(engine.snapshot(), &before);
}

#[test]
fn regression_with_reason_records_it_and_moves_card_back() {
    let mut engine = BoardEngine::new();
    add_to_mid(&mut engine, 3);

    let mut prompter = || Some("  waiting on vendor ".to_string());
    let outcome = engine
        .toggle_item(ColumnId::Mid, 0, 1, &mut prompter)
        .unwrap();

    assert!(matches!(
        outcome,
        ToggleOutcome::Moved {
            from: ColumnId::Mid,
            to: ColumnId::Entry,
            ..
        }
    ));
    let card = engine.card(ColumnId::Entry, 0).unwrap();
    assert_eq!(card.reason_for_move, "waiting on vendor");
    assert_eq!(card.completed_count(), 1);
    assert!(!card.items[1].completed);
    assert!(engine.column(ColumnId::Mid).is_empty());
}

#[test]
fn regression_into_full_entry_waits_without_prompting() {
    let mut engine = BoardEngine::new();
    add_to_mid(&mut engine, 3);
    for _ in 0..3 {
        add(&mut engine, ColumnId::Entry, 3);
    }

    let asked = Cell::new(0);
    let mut prompter = || {
        asked.set(asked.get() + 1);
        Some("reason".to_string())
    };
    let outcome = engine
        .toggle_item(ColumnId::Mid, 0, 0, &mut prompter)
        .unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Waiting {
            target: ColumnId::Entry
        }
    );
    assert_eq!(asked.get(), 0);
    assert_eq!(engine.column(ColumnId::Entry).len(), 3);
    let card = engine.card(ColumnId::Mid, 0).unwrap();
    assert_eq!(card.completed_count(), 1);
    assert_eq!(card.reason_for_move, "");
}

#[test]
fn toggles_in_done_never_move_the_card() {
    let mut engine = BoardEngine::new();
    add(&mut engine, ColumnId::Entry, 3);
    engine.move_card(ColumnId::Entry, ColumnId::Done, 0).unwrap();
    let stamped = engine.card(ColumnId::Done, 0).unwrap().completed_date;
    assert!(stamped.is_some());

    assert_eq!(toggle(&mut engine, ColumnId::Done, 0, 0), ToggleOutcome::Updated);
    assert_eq!(toggle(&mut engine, ColumnId::Done, 0, 0), ToggleOutcome::Updated);
    assert_eq!(engine.column(ColumnId::Done).len(), 1);
    assert_eq!(engine.card(ColumnId::Done, 0).unwrap().completed_date, stamped);
}

#[test]
fn move_card_preserves_total_and_manages_completion_date() {
    let mut engine = BoardEngine::new();
    add(&mut engine, ColumnId::Entry, 3);
    add(&mut engine, ColumnId::Entry, 4);
    add(&mut engine, ColumnId::Mid, 5);
    let total = engine.card_count();

    let moved_id = engine.move_card(ColumnId::Entry, ColumnId::Done, 0).unwrap();
    assert_eq!(engine.card_count(), total);
    assert_eq!(engine.column(ColumnId::Entry).len(), 1);
    assert_eq!(engine.find_card(moved_id), Some((ColumnId::Done, 0)));
    assert!(engine.card(ColumnId::Done, 0).unwrap().completed_date.is_some());

    engine.move_card(ColumnId::Done, ColumnId::Mid, 0).unwrap();
    assert_eq!(engine.card_count(), total);
    assert_eq!(engine.find_card(moved_id), Some((ColumnId::Mid, 1)));
    assert_eq!(engine.card(ColumnId::Mid, 1).unwrap().completed_date, None);
}

#[test]
fn move_card_keeps_order_of_remaining_cards() {
    let mut engine = BoardEngine::new();
    let first = engine.add_card(ColumnId::Entry, "first", ["a", "b", "c"]).unwrap();
    let second = engine.add_card(ColumnId::Entry, "second", ["a", "b", "c"]).unwrap();
    let third = engine.add_card(ColumnId::Entry, "third", ["a", "b", "c"]).unwrap();

    engine.move_card(ColumnId::Entry, ColumnId::Mid, 1).unwrap();

    let remaining: Vec<_> = engine
        .column(ColumnId::Entry)
        .cards
        .iter()
        .map(|card| card.id)
        .collect();
    assert_eq!(remaining, [first.id, third.id]);
    assert_eq!(engine.card(ColumnId::Mid, 0).unwrap().id, second.id);
}

#[test]
fn move_card_rejects_full_target_and_bad_index() {
    let mut engine = BoardEngine::new();
    for _ in 0..5 {
        add(&mut engine, ColumnId::Mid, 3);
    }
    add(&mut engine, ColumnId::Entry, 3);
    let before = engine.snapshot().clone();

    let err = engine.move_card(ColumnId::Entry, ColumnId::Mid, 0).unwrap_err();
    assert_eq!(err, BoardError::ColumnFull(ColumnId::Mid));
    let err = engine.move_card(ColumnId::Entry, ColumnId::Done, 4).unwrap_err();
    assert_eq!(
        err,
        BoardError::CardNotFound {
            column: ColumnId::Entry,
            card: 4
        }
    );
    assert_eq!(engine.snapshot(), &before);
}

#[test]
fn add_card_validates_item_count_and_leaves_state_unchanged() {
    let mut engine = BoardEngine::new();

    let err = engine
        .add_card(ColumnId::Entry, "t", ["a", "b"])
        .unwrap_err();
    assert_eq!(
        err,
        BoardError::Validation(CardValidationError::ItemCount { count: 2 })
    );
    let err = engine
        .add_card(ColumnId::Entry, "t", ["a", "b", "c", "d", "e", "f"])
        .unwrap_err();
    assert_eq!(
        err,
        BoardError::Validation(CardValidationError::ItemCount { count: 6 })
    );
    assert_eq!(engine.card_count(), 0);

    for count in 3..=5 {
        add(&mut engine, ColumnId::Mid, count);
    }
    let counts: Vec<usize> = engine
        .column(ColumnId::Mid)
        .cards
        .iter()
        .map(|card| card.items.len())
        .collect();
    assert_eq!(counts, [3, 4, 5]);
}

#[test]
fn can_add_card_follows_column_capacity() {
    let mut engine = BoardEngine::new();
    for _ in 0..3 {
        assert!(engine.can_add_card(ColumnId::Entry));
        add(&mut engine, ColumnId::Entry, 3);
    }
    assert!(!engine.can_add_card(ColumnId::Entry));

    for _ in 0..5 {
        assert!(engine.can_add_card(ColumnId::Mid));
        add(&mut engine, ColumnId::Mid, 3);
    }
    assert!(!engine.can_add_card(ColumnId::Mid));

    assert!(!engine.can_add_card(ColumnId::Done));
}

#[test]
fn done_column_rejects_direct_adds() {
    let mut engine = BoardEngine::new();
    assert!(!engine.can_add_card(ColumnId::Done));

    engine.draft_mut().title = "shortcut".to_string();
    let err = engine
        .add_card(ColumnId::Done, "shortcut", ["a", "b", "c"])
        .unwrap_err();
    assert_eq!(err, BoardError::AddNotAllowed(ColumnId::Done));
    assert_eq!(engine.card_count(), 0);
    assert_eq!(engine.draft().title, "shortcut");

    add_to_mid(&mut engine, 3);
    toggle(&mut engine, ColumnId::Mid, 0, 2);
    let done = engine.column(ColumnId::Done);
    assert_eq!(done.len(), 1);
    assert!(done.cards.iter().all(|card| card.completed_date.is_some()));
}

#[test]
fn moving_within_a_column_changes_nothing() {
    let mut engine = BoardEngine::new();
    add(&mut engine, ColumnId::Entry, 3);
    add(&mut engine, ColumnId::Entry, 4);
    let first = engine.card(ColumnId::Entry, 0).unwrap().id;
    engine.move_card(ColumnId::Entry, ColumnId::Done, 0).unwrap();
    engine.move_card(ColumnId::Entry, ColumnId::Done, 0).unwrap();
    let before = engine.snapshot().clone();

    let id = engine.move_card(ColumnId::Done, ColumnId::Done, 0).unwrap();
    assert_eq!(id, first);
    assert_eq!(engine.snapshot(), &before);

    add(&mut engine, ColumnId::Entry, 3);
    add(&mut engine, ColumnId::Entry, 3);
    add(&mut engine, ColumnId::Entry, 3);
    let before = engine.snapshot().clone();
    engine.move_card(ColumnId::Entry, ColumnId::Entry, 0).unwrap();
    assert_eq!(engine.snapshot(), &before);
}

#[test]
fn first_regression_reason_is_kept() {
    let mut engine = BoardEngine::new();
    add_to_mid(&mut engine, 3);

    let mut first = || Some("blocked".to_string());
    engine
        .toggle_item(ColumnId::Mid, 0, 0, &mut first)
        .unwrap();
    add_to_mid_from_entry(&mut engine);

    let mut second = || Some("blocked again".to_string());
    let outcome = engine
        .toggle_item(ColumnId::Mid, 0, 0, &mut second)
        .unwrap();
    assert!(matches!(outcome, ToggleOutcome::Moved { to: ColumnId::Entry, .. }));
    assert_eq!(
        engine.card(ColumnId::Entry, 0).unwrap().reason_for_move,
        "blocked"
    );
}

#[test]
fn draft_is_kept_on_failure_and_cleared_on_success() {
    let mut engine = BoardEngine::new();
    engine.draft_mut().title = "weekly".to_string();
    engine.draft_mut().set_item(0, "plan");
    engine.draft_mut().set_item(1, "review");

    let err = engine.submit_draft(ColumnId::Entry).unwrap_err();
    assert!(matches!(err, BoardError::Validation(_)));
    assert_eq!(engine.draft().title, "weekly");
    assert_eq!(engine.draft().items[1], "review");

    engine.draft_mut().set_item(2, "ship");
    let card = engine.submit_draft(ColumnId::Entry).unwrap();
    assert_eq!(card.title, "weekly");
    assert_eq!(card.items.len(), 3);
    assert!(engine.draft().is_empty());
}

#[test]
fn items_count_is_fixed_across_every_transition() {
    let mut engine = BoardEngine::new();
    add_to_mid(&mut engine, 4);
    add_to_mid(&mut engine, 5);
    add(&mut engine, ColumnId::Entry, 3);
    let mut prompter = || Some("redo".to_string());
    engine.toggle_item(ColumnId::Mid, 0, 0, &mut prompter).unwrap();

    for (_, card) in engine.snapshot().cards() {
        assert!((3..=5).contains(&card.items.len()));
    }
    assert_eq!(engine.card_count(), 3);
}
