//! CLI command implementations.

pub mod analyze;
pub mod chat;
pub mod clean;
pub mod copy;
pub mod delete;
pub mod list;
pub mod regenerate;
pub mod show;
pub mod status;

use crate::client::HttpAnalyzer;
use crate::config::Config;
use crate::core::{Chat, Completion, Message, SessionStore};
use crate::error::{Error, Result};
use crate::storage::FileBackend;
use crate::view::render_card;
use colored::Colorize;

/// Open the file-backed session store described by `config`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created.
pub fn open_store(config: &Config) -> Result<SessionStore> {
    let backend = FileBackend::new(&config.storage.path)?;
    Ok(SessionStore::open(Box::new(backend)).with_name_max_len(config.history.name_max_len))
}

/// Build the HTTP analyzer described by `config`.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid.
pub fn analyzer(config: &Config) -> Result<HttpAnalyzer> {
    HttpAnalyzer::new(&config.api.endpoint, config.api.timeout())
}

/// Make `id` the active session, failing if it doesn't exist.
///
/// # Errors
///
/// Returns [`Error::SessionNotFound`] for unknown ids.
pub fn load_existing(store: &mut SessionStore, id: &str) -> Result<()> {
    if store.session(id).is_none() {
        return Err(Error::SessionNotFound(id.to_string()));
    }
    store.load_session(id);
    Ok(())
}

/// Render one transcript entry.
#[must_use]
pub fn render_message(index: usize, message: &Message) -> String {
    match message {
        Message::User { content } => {
            format!("{} {}\n", format!("[{index}] you:").bright_black(), content)
        }
        Message::Assistant { content, .. } => {
            format!(
                "{}\n{}",
                format!("[{index}] impactwatch:").green(),
                render_card(content)
            )
        }
    }
}

/// Print the outcome of a finished request.
///
/// # Errors
///
/// Returns [`Error::Analysis`] when the request failed, so one-shot commands
/// exit unsuccessfully.
pub fn report_completion<A>(chat: &Chat<A>, completion: Completion) -> Result<()>
where
    A: crate::client::Analyzer,
{
    match completion {
        Completion::Appended { ref session_id, .. } => {
            let store = chat.store();
            if let Some(session) = store.session(session_id) {
                let index = session.messages.len().saturating_sub(1);
                if let Some(message) = session.messages.last() {
                    print!("{}", render_message(index, message));
                }
            }
            Ok(())
        }
        Completion::Discarded { session_id } => {
            println!(
                "{}",
                format!("Session {session_id} was deleted; result discarded.").yellow()
            );
            Ok(())
        }
        Completion::Failed { error, .. } => Err(Error::Analysis(error)),
    }
}
