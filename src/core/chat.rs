//! Chat controller: submissions, regeneration, and request completion.
//!
//! Every outbound request is tagged with the session that issued it. When the
//! response arrives the assistant message goes to that session, even if the
//! user has switched elsewhere in the meantime.

use crate::client::{AnalysisError, Analyzer};
use crate::core::session::{AnalysisResult, Message};
use crate::core::store::SessionStore;
use crate::error::{Error, Result};
use tracing::{debug, error, warn};

/// An analysis request that has been issued but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Session the request was issued from.
    pub session_id: String,

    /// Text sent for analysis.
    pub prompt: String,

    /// Whether this re-runs an earlier prompt.
    pub regenerate: bool,
}

/// What happened when a request completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result was appended to its originating session.
    Appended {
        /// Session that received the assistant message.
        session_id: String,

        /// Whether that session is still the active one.
        active: bool,
    },

    /// The originating session was deleted while the request was in flight.
    Discarded {
        /// Id of the vanished session.
        session_id: String,
    },

    /// The request failed; nothing was appended.
    Failed {
        /// Session the request was issued from.
        session_id: String,

        /// Why it failed.
        error: AnalysisError,
    },
}

impl Completion {
    /// The appended result, looked up in the store.
    #[must_use]
    pub fn result<'a>(&self, store: &'a SessionStore) -> Option<&'a AnalysisResult> {
        match self {
            Self::Appended { session_id, .. } => store
                .session(session_id)
                .and_then(|s| s.messages.last())
                .and_then(Message::result),
            _ => None,
        }
    }
}

/// Drives one conversation against a [`SessionStore`] and an [`Analyzer`].
#[derive(Debug)]
pub struct Chat<A> {
    store: SessionStore,
    analyzer: A,
    loading: bool,
}

impl<A: Analyzer> Chat<A> {
    /// Create a controller over a hydrated store.
    #[must_use]
    pub fn new(store: SessionStore, analyzer: A) -> Self {
        Self {
            store,
            analyzer,
            loading: false,
        }
    }

    /// The underlying session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Mutable access for session switching and deletion.
    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// The analyzer in use.
    #[must_use]
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a new submission.
    ///
    /// Creates a session when none is active and appends the user message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for blank text and
    /// [`Error::RequestInFlight`] while another request is outstanding.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingRequest> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.loading {
            return Err(Error::RequestInFlight);
        }

        let active = self.store.active_session().map(|s| s.id.clone());
        let session_id = match active {
            Some(id) => id,
            None => self.store.create_session(text),
        };

        self.store.append_message(&session_id, Message::user(text));
        self.loading = true;
        debug!(session_id = %session_id, "submission started");

        Ok(PendingRequest {
            session_id,
            prompt: text.to_string(),
            regenerate: false,
        })
    }

    /// Start re-running the prompt behind the assistant message at `index`
    /// in the active session. No user message is added.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the message is missing or
    /// not an assistant message with a stored prompt, or a request is already
    /// outstanding.
    pub fn begin_regenerate(&mut self, index: usize) -> Result<PendingRequest> {
        if self.loading {
            return Err(Error::RequestInFlight);
        }

        let session = self.store.active_session().ok_or(Error::NoActiveSession)?;
        let message = session
            .messages
            .get(index)
            .ok_or_else(|| Error::InvalidMessage(format!("no message at index {index}")))?;
        let prompt = message.prompt().ok_or_else(|| {
            Error::InvalidMessage(format!("message {index} has no prompt to regenerate"))
        })?;

        let pending = PendingRequest {
            session_id: session.id.clone(),
            prompt: prompt.to_string(),
            regenerate: true,
        };

        self.loading = true;
        debug!(session_id = %pending.session_id, index, "regeneration started");
        Ok(pending)
    }

    /// Finish a request with the analyzer's outcome.
    pub fn complete(
        &mut self,
        pending: PendingRequest,
        outcome: std::result::Result<AnalysisResult, AnalysisError>,
    ) -> Completion {
        self.loading = false;
        let PendingRequest {
            session_id, prompt, ..
        } = pending;

        match outcome {
            Ok(result) => {
                if self
                    .store
                    .append_message(&session_id, Message::assistant(result, prompt))
                {
                    let active = self.store.active_id() == Some(session_id.as_str());
                    if !active {
                        debug!(session_id = %session_id, "result delivered to inactive session");
                    }
                    Completion::Appended { session_id, active }
                } else {
                    warn!(session_id = %session_id, "session deleted before result arrived; discarding");
                    Completion::Discarded { session_id }
                }
            }
            Err(e) => {
                error!(session_id = %session_id, kind = e.kind(), error = %e, "analysis request failed");
                Completion::Failed {
                    session_id,
                    error: e,
                }
            }
        }
    }

    /// Submit `text` and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is rejected; request failures are
    /// reported as [`Completion::Failed`].
    pub async fn submit(&mut self, text: &str) -> Result<Completion> {
        let pending = self.begin_submit(text)?;
        let outcome = self.analyzer.analyze(&pending.prompt).await;
        Ok(self.complete(pending, outcome))
    }

    /// Regenerate the assistant message at `index` and wait for the result.
    ///
    /// # Errors
    ///
    /// See [`Chat::begin_regenerate`].
    pub async fn regenerate(&mut self, index: usize) -> Result<Completion> {
        let pending = self.begin_regenerate(index)?;
        let outcome = self.analyzer.analyze(&pending.prompt).await;
        Ok(self.complete(pending, outcome))
    }

    /// Regenerate the most recent result in the active session.
    ///
    /// # Errors
    ///
    /// Returns an error if the active session has no result yet; otherwise
    /// see [`Chat::begin_regenerate`].
    pub async fn regenerate_last(&mut self) -> Result<Completion> {
        let index = self
            .store
            .active_session()
            .ok_or(Error::NoActiveSession)?
            .last_result()
            .map(|(i, _)| i)
            .ok_or_else(|| Error::InvalidMessage("no result to regenerate".to_string()))?;
        self.regenerate(index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::ModelComparison;
    use crate::storage::MemoryBackend;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Analyzer that labels everything the same and records each prompt.
    #[derive(Debug, Default)]
    struct FakeAnalyzer {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Analyzer for FakeAnalyzer {
        async fn analyze(&self, text: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
            self.prompts.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(AnalysisError::Transport("connection refused".to_string()));
            }
            Ok(sample_result())
        }
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            sentiment: "Ethical Concern".to_string(),
            confidence: 0.82,
            model_comparison: ModelComparison {
                naive_bayes: "Ethical Concern".to_string(),
                logistic_regression: "Ethical Concern".to_string(),
            },
        }
    }

    fn make_chat() -> Chat<FakeAnalyzer> {
        let store = SessionStore::open(Box::new(MemoryBackend::new()));
        Chat::new(store, FakeAnalyzer::default())
    }

    #[test]
    fn blank_input_is_rejected_without_side_effects() {
        let mut chat = make_chat();

        assert!(matches!(chat.begin_submit("   \n\t"), Err(Error::EmptyInput)));
        assert!(chat.store().sessions().is_empty());
        assert!(!chat.is_loading());
    }

    #[test]
    fn first_submission_creates_session() {
        let mut chat = make_chat();

        let pending = chat.begin_submit("hello world").unwrap();

        let session = chat.store().active_session().unwrap();
        assert_eq!(session.id, pending.session_id);
        assert_eq!(session.name, "hello world");
        assert_eq!(session.messages, vec![Message::user("hello world")]);
        assert!(chat.is_loading());
        assert!(!pending.regenerate);
    }

    #[test]
    fn submission_while_loading_is_rejected() {
        let mut chat = make_chat();
        chat.begin_submit("first").unwrap();

        assert!(matches!(
            chat.begin_submit("second"),
            Err(Error::RequestInFlight)
        ));
        assert_eq!(chat.store().active_messages().len(), 1);
    }

    #[test]
    fn later_submissions_reuse_active_session() {
        let mut chat = make_chat();
        let first = chat.begin_submit("first").unwrap();
        chat.complete(first, Ok(sample_result()));

        let second = chat.begin_submit("second").unwrap();

        assert_eq!(chat.store().sessions().len(), 1);
        assert_eq!(second.session_id, chat.store().sessions()[0].id);
        assert_eq!(chat.store().active_messages().len(), 3);
    }

    #[test]
    fn complete_appends_assistant_with_prompt() {
        let mut chat = make_chat();
        let pending = chat.begin_submit("prompt text").unwrap();
        let session_id = pending.session_id.clone();

        let completion = chat.complete(pending, Ok(sample_result()));

        assert_eq!(
            completion,
            Completion::Appended {
                session_id,
                active: true
            }
        );
        assert!(!chat.is_loading());
        let last = chat.store().active_messages().last().unwrap();
        assert_eq!(last.prompt(), Some("prompt text"));
        assert_eq!(completion.result(chat.store()), Some(&sample_result()));
    }

    #[test]
    fn failure_is_surfaced_and_appends_nothing() {
        let mut chat = make_chat();
        let pending = chat.begin_submit("doomed").unwrap();

        let completion = chat.complete(pending, Err(AnalysisError::Timeout));

        assert!(matches!(
            completion,
            Completion::Failed {
                error: AnalysisError::Timeout,
                ..
            }
        ));
        assert!(!chat.is_loading());
        assert_eq!(chat.store().active_messages().len(), 1);
        assert!(completion.result(chat.store()).is_none());
    }

    #[test]
    fn response_is_pinned_to_originating_session() {
        let mut chat = make_chat();
        let pending = chat.begin_submit("first conversation").unwrap();
        let origin = pending.session_id.clone();

        // User starts another conversation while the request is in flight
        chat.store_mut().clear_active_session();
        let other = chat.store_mut().create_session("second conversation");

        let completion = chat.complete(pending, Ok(sample_result()));

        assert_eq!(
            completion,
            Completion::Appended {
                session_id: origin.clone(),
                active: false
            }
        );
        assert_eq!(chat.store().session(&origin).unwrap().messages.len(), 2);
        assert!(chat.store().session(&other).unwrap().messages.is_empty());
    }

    #[test]
    fn response_for_deleted_session_is_discarded() {
        let mut chat = make_chat();
        let pending = chat.begin_submit("short lived").unwrap();
        let origin = pending.session_id.clone();

        chat.store_mut().delete_session(&origin);
        let completion = chat.complete(pending, Ok(sample_result()));

        assert_eq!(completion, Completion::Discarded { session_id: origin });
        assert!(chat.store().sessions().is_empty());
        assert!(!chat.is_loading());
    }

    #[test]
    fn regenerate_requires_assistant_message() {
        let mut chat = make_chat();
        let pending = chat.begin_submit("question").unwrap();
        chat.complete(pending, Ok(sample_result()));

        assert!(matches!(
            chat.begin_regenerate(0),
            Err(Error::InvalidMessage(_))
        ));
        assert!(matches!(
            chat.begin_regenerate(7),
            Err(Error::InvalidMessage(_))
        ));
        assert!(!chat.is_loading());
    }

    #[test]
    fn regenerate_without_active_session() {
        let mut chat = make_chat();
        assert!(matches!(
            chat.begin_regenerate(0),
            Err(Error::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn submit_round_trip() {
        let mut chat = make_chat();

        let completion = chat.submit("I love how AI handles the boring tasks").await.unwrap();

        assert!(matches!(completion, Completion::Appended { active: true, .. }));
        assert_eq!(chat.store().active_messages().len(), 2);
        assert_eq!(
            *chat.analyzer().prompts.lock().unwrap(),
            vec!["I love how AI handles the boring tasks".to_string()]
        );
    }

    #[tokio::test]
    async fn regenerate_reuses_prompt_without_user_message() {
        let mut chat = make_chat();
        chat.submit("original prompt").await.unwrap();

        let completion = chat.regenerate(1).await.unwrap();

        assert!(matches!(completion, Completion::Appended { .. }));
        let messages = chat.store().active_messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages.iter().filter(|m| m.is_user()).count(), 1);
        assert_eq!(messages[2].prompt(), Some("original prompt"));
        assert_eq!(chat.analyzer().prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn regenerate_last_picks_latest_result() {
        let mut chat = make_chat();
        chat.submit("one").await.unwrap();
        chat.submit("two").await.unwrap();

        chat.regenerate_last().await.unwrap();

        let prompts = chat.analyzer().prompts.lock().unwrap().clone();
        assert_eq!(prompts, vec!["one", "two", "two"]);
    }

    #[tokio::test]
    async fn failed_submit_reports_error_kind() {
        let store = SessionStore::open(Box::new(MemoryBackend::new()));
        let mut chat = Chat::new(
            store,
            FakeAnalyzer {
                fail: true,
                ..FakeAnalyzer::default()
            },
        );

        let completion = chat.submit("anything").await.unwrap();

        match completion {
            Completion::Failed { error, .. } => assert_eq!(error.kind(), "network"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!chat.is_loading());
    }
}
