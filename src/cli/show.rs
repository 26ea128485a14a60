//! `impactwatch show` command implementation.

use crate::cli::{open_store, render_message};
use crate::config::Config;
use crate::error::{Error, Result};

/// Run the show command.
///
/// Prints the full transcript of a saved session.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the session is not found.
pub fn run(config: &Config, session_id: &str) -> Result<()> {
    let store = open_store(config)?;

    let session = store
        .session(session_id)
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

    println!("{} ({})", session.name, session.id);
    println!("{}", "─".repeat(60));

    if session.messages.is_empty() {
        println!("(no messages)");
    }
    for (index, message) in session.messages.iter().enumerate() {
        print!("{}", render_message(index, message));
        println!();
    }

    Ok(())
}
