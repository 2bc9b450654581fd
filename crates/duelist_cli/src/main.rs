//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `duelist_core` linkage without a host UI.
//! - Run a short scripted session and print the rendered card list.
//!
//! # Environment
//! - `DUELIST_LOG_DIR`: absolute directory for rolling logs; unset disables
//!   file logging.
//! - `DUELIST_LOG`: log level, defaults to `default_log_level()`.

use chrono::{Duration, Local, Utc};
use duelist_core::{TaskCard, TaskDraft, TaskStore, TaskStoreError};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("duelist_core ping={}", duelist_core::ping());
    println!("duelist_core version={}", duelist_core::core_version());

    if let Err(err) = init_logging_from_env() {
        eprintln!("logging disabled: {err}");
    }

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging_from_env() -> Result<(), duelist_core::LoggingError> {
    let Some(log_dir) = env_non_empty("DUELIST_LOG_DIR") else {
        return Ok(());
    };
    let level = env_non_empty("DUELIST_LOG")
        .unwrap_or_else(|| duelist_core::default_log_level().to_string());
    duelist_core::init_logging(&level, &log_dir)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn run_demo() -> Result<(), TaskStoreError> {
    let now = Utc::now();
    let mut store = TaskStore::in_memory();

    store.create(TaskDraft {
        image: None,
        title: "Buy milk".to_string(),
        description: "2%".to_string(),
        due_date: now + Duration::days(9),
    })?;
    let rent = store.create(TaskDraft {
        image: None,
        title: "Pay rent".to_string(),
        description: String::new(),
        due_date: now + Duration::hours(10),
    })?;
    store.create(TaskDraft {
        image: Some("content://media/1".to_string()),
        title: "Renew passport".to_string(),
        description: "photo booth first".to_string(),
        due_date: now + Duration::days(3),
    })?;
    store.toggle_complete(rent.id)?;

    println!("-- insertion order");
    print_cards(&store.cards(now, &Local));

    store.set_sort_mode(true);
    println!("-- sorted by due date");
    print_cards(&store.cards(now, &Local));
    Ok(())
}

fn print_cards(cards: &[TaskCard]) {
    for card in cards {
        let mark = if card.completed { "x" } else { " " };
        println!(
            "[{mark}] {:<16} {:<14} {:?} {}",
            card.title, card.due_label, card.urgency, card.accent
        );
    }
}
