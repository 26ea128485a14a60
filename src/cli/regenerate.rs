//! `impactwatch regenerate` command implementation.

use crate::cli::{analyzer, load_existing, open_store, report_completion};
use crate::config::Config;
use crate::core::Chat;
use crate::error::Result;

/// Run the regenerate command.
///
/// Re-submits the prompt behind an earlier result (the latest one unless
/// `index` is given) and appends the fresh result to the same session.
///
/// # Errors
///
/// Returns an error if the session or message is invalid, or the request fails.
pub async fn run(config: &Config, session_id: &str, index: Option<usize>) -> Result<()> {
    let mut store = open_store(config)?;
    load_existing(&mut store, session_id)?;

    let mut chat = Chat::new(store, analyzer(config)?);
    let completion = match index {
        Some(i) => chat.regenerate(i).await?,
        None => chat.regenerate_last().await?,
    };

    report_completion(&chat, completion)
}
