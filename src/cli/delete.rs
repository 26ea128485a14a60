//! `impactwatch delete` command implementation.

use crate::cli::open_store;
use crate::config::Config;
use crate::error::{Error, Result};

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the session is not found.
pub fn run(config: &Config, session_id: &str) -> Result<()> {
    let mut store = open_store(config)?;

    if store.session(session_id).is_none() {
        return Err(Error::SessionNotFound(session_id.to_string()));
    }

    store.delete_session(session_id);
    println!("Deleted session {session_id}");
    Ok(())
}
