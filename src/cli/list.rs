//! `impactwatch list` command implementation.

use crate::cli::open_store;
use crate::config::Config;
use crate::core::Session;
use crate::error::Result;
use chrono::{DateTime, Local, Utc};

/// Run the list command.
///
/// Shows saved sessions, newest first, with their IDs, last update, and name.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config, limit: Option<usize>) -> Result<()> {
    let store = open_store(config)?;
    let limit = limit.unwrap_or(config.history.list_limit);

    let sessions = store.sessions();

    if sessions.is_empty() {
        println!("No sessions found.");
        println!("\nHistory is stored in: {}", config.storage.path.display());
        return Ok(());
    }

    println!(
        "{:<34} {:<17} {:>5}  Name",
        "Session ID", "Updated", "Msgs"
    );
    println!("{}", "─".repeat(100));

    let shown = &sessions[..limit.min(sessions.len())];
    for session in shown {
        println!("{}", format_row(session));
    }

    println!("{}", "─".repeat(100));
    println!("Showing {} of {} session(s)", shown.len(), sessions.len());

    Ok(())
}

/// Format one table row.
fn format_row(session: &Session) -> String {
    format!(
        "{:<34} {:<17} {:>5}  {}",
        session.id,
        format_local_time(session.updated_at),
        session.messages.len(),
        first_line(&session.name),
    )
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Names may contain newlines from multi-line first messages.
fn first_line(name: &str) -> &str {
    name.lines().next().unwrap_or(name)
}
