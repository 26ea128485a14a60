//! `impactwatch analyze` command implementation.

use crate::cli::{analyzer, load_existing, open_store, report_completion};
use crate::config::Config;
use crate::core::Chat;
use crate::error::{Error, Result};

/// Run the analyze command.
///
/// Submits `text` as one exchange, either in a fresh session or appended to
/// an existing one, and prints the result card.
///
/// # Errors
///
/// Returns an error if the session does not exist, storage cannot be opened,
/// or the analysis request fails.
pub async fn run(config: &Config, text: &str, session_id: Option<&str>) -> Result<()> {
    let mut store = open_store(config)?;
    if let Some(id) = session_id {
        load_existing(&mut store, id)?;
    }

    let mut chat = Chat::new(store, analyzer(config)?);

    let completion = match chat.submit(text).await {
        Err(Error::EmptyInput) => {
            println!("Nothing to analyze.");
            return Ok(());
        }
        other => other?,
    };

    if let Some(session) = chat.store().active_session() {
        println!("Session: {} ({})\n", session.name, session.id);
    }

    report_completion(&chat, completion)
}
