//! `impactwatch copy` command implementation.

use crate::cli::open_store;
use crate::config::Config;
use crate::core::{AnalysisResult, Session};
use crate::error::{Error, Result};
use crate::view::summary_text;

/// Run the copy command.
///
/// Prints the plain-text summary of a result so it can be piped to a
/// clipboard tool.
///
/// # Errors
///
/// Returns an error if the session is not found or has no matching result.
pub fn run(config: &Config, session_id: &str, index: Option<usize>) -> Result<()> {
    let store = open_store(config)?;

    let session = store
        .session(session_id)
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

    println!("{}", summary_text(select_result(session, index)?));
    Ok(())
}

/// Pick the result at `index`, or the latest one.
///
/// # Errors
///
/// Returns an error if there is no assistant result at that position.
pub fn select_result(session: &Session, index: Option<usize>) -> Result<&AnalysisResult> {
    match index {
        Some(i) => session
            .messages
            .get(i)
            .and_then(|m| m.result())
            .ok_or_else(|| Error::InvalidMessage(format!("message {i} is not a result"))),
        None => session
            .last_result()
            .map(|(_, r)| r)
            .ok_or_else(|| Error::InvalidMessage("session has no results".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Message, ModelComparison};

    fn result(label: &str) -> AnalysisResult {
        AnalysisResult {
            sentiment: label.to_string(),
            confidence: 0.75,
            model_comparison: ModelComparison {
                naive_bayes: label.to_string(),
                logistic_regression: label.to_string(),
            },
        }
    }

    fn session_with_results() -> Session {
        let mut session = Session::new("copy me", 50);
        session.push_message(Message::user("copy me"));
        session.push_message(Message::assistant(result("Optimism"), "copy me"));
        session.push_message(Message::assistant(result("Economic Anxiety"), "copy me"));
        session
    }

    #[test]
    fn defaults_to_latest_result() {
        let session = session_with_results();
        assert_eq!(
            select_result(&session, None).unwrap().sentiment,
            "Economic Anxiety"
        );
    }

    #[test]
    fn picks_result_by_index() {
        let session = session_with_results();
        assert_eq!(select_result(&session, Some(1)).unwrap().sentiment, "Optimism");
    }

    #[test]
    fn user_message_is_not_a_result() {
        let session = session_with_results();
        assert!(matches!(
            select_result(&session, Some(0)),
            Err(Error::InvalidMessage(_))
        ));
    }

    #[test]
    fn empty_session_has_no_result() {
        let session = Session::new("empty", 50);
        assert!(select_result(&session, None).is_err());
    }
}
