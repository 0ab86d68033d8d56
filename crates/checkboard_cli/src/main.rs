//! Command-line driver over `checkboard_core`.
//!
//! # Responsibility
//! - Open the SQLite snapshot, run one board operation, and let the core
//!   service persist the result.
//! - Act as the presentation layer: gate the add form and report outcomes.

mod cli;

use anyhow::{bail, Context, Result};
use checkboard_core::db::open_db;
use checkboard_core::{
    default_log_level, init_logging, BoardService, BoardStore, Card, ColumnId, Prompter,
    SqliteBoardStore, ToggleOutcome,
};
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open board database `{}`", cli.db.display()))?;
    let store = SqliteBoardStore::new(&conn);

    match cli.command {
        Commands::Show { json } => {
            let service = BoardService::open(store, || None::<String>)?;
            if json {
                println!("{}", serde_json::to_string_pretty(service.snapshot())?);
            } else {
                print_board(&service);
            }
        }
        Commands::Add {
            column,
            title,
            items,
        } => {
            let column = ColumnId::try_from(usize::from(column))?;
            let mut service = BoardService::open(store, || None::<String>)?;
            if !service.engine().can_add_card(column) {
                bail!("{column} column is full");
            }
            if column == ColumnId::Entry && service.engine().is_add_button_disabled() {
                bail!("entry column is locked until the mid column has room");
            }
            let card = service.add_card(column, &title, &items)?;
            println!("added card {} to {column} column", card.id);
        }
        Commands::Toggle {
            column,
            card,
            item,
            reason,
        } => {
            let column = ColumnId::try_from(column)?;
            let mut service = BoardService::open(store, move || reason.clone())?;
            let outcome = service.toggle_item(column, card, item)?;
            report_toggle(&outcome);
        }
        Commands::Reset => {
            let mut service = BoardService::open(store, || None::<String>)?;
            service.reset()?;
            println!("board cleared");
        }
    }

    Ok(())
}

fn report_toggle(outcome: &ToggleOutcome) {
    match outcome {
        ToggleOutcome::Ignored => println!("card is locked; nothing changed"),
        ToggleOutcome::Updated => println!("item toggled"),
        ToggleOutcome::Moved { card_id, from, to } => {
            println!("card {card_id} moved from {from} to {to} column");
        }
        ToggleOutcome::Waiting { target } => {
            println!("item toggled; card waits until the {target} column has room");
        }
        ToggleOutcome::MoveAborted => {
            println!("no reason given; card was not moved back (use --reason)");
        }
    }
}

fn print_board<S: BoardStore, P: Prompter>(service: &BoardService<S, P>) {
    for (index, column) in service.engine().columns().iter().enumerate() {
        let lock = if column.locked { " [locked]" } else { "" };
        println!("[{index}] {} ({} cards){lock}", column.title, column.len());
        for (card_index, card) in column.cards.iter().enumerate() {
            print_card(card_index, card);
        }
    }
}

fn print_card(index: usize, card: &Card) {
    println!(
        "  #{index} {} {}/{}",
        card.title,
        card.completed_count(),
        card.items.len()
    );
    for item in &card.items {
        let mark = if item.completed { 'x' } else { ' ' };
        println!("     [{mark}] {}", item.text);
    }
    if let Some(date) = card.completed_date_display() {
        println!("     completed: {date}");
    }
    if card.has_reason_for_move() {
        println!("     moved back: {}", card.reason_for_move);
    }
}
