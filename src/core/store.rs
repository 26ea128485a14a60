//! Session store: the canonical collection of chat sessions.
//!
//! The store owns every session, the active-session pointer, and the only
//! path to durable storage. Each change to the collection is written back in
//! full once the initial read (hydration) has completed; nothing is written
//! before that, so an empty starting state can never clobber saved history.

use crate::core::session::{DEFAULT_NAME_MAX_LEN, Message, Session};
use crate::storage::HistoryStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// On-disk shape of the history blob.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    sessions: Vec<Session>,
}

/// In-memory session collection mirrored to a [`HistoryStore`].
pub struct SessionStore {
    backend: Box<dyn HistoryStore>,
    sessions: Vec<Session>,
    active_id: Option<String>,
    hydrated: bool,
    name_max_len: usize,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .field("active_id", &self.active_id)
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty, not yet hydrated store.
    #[must_use]
    pub fn new(backend: Box<dyn HistoryStore>) -> Self {
        Self {
            backend,
            sessions: Vec::new(),
            active_id: None,
            hydrated: false,
            name_max_len: DEFAULT_NAME_MAX_LEN,
        }
    }

    /// Create a store and hydrate it from the backend.
    #[must_use]
    pub fn open(backend: Box<dyn HistoryStore>) -> Self {
        let mut store = Self::new(backend);
        store.hydrate();
        store
    }

    /// Set the maximum session name length.
    #[must_use]
    pub fn with_name_max_len(mut self, name_max_len: usize) -> Self {
        self.name_max_len = name_max_len;
        self
    }

    /// Load persisted sessions. Runs once; later calls are no-ops.
    ///
    /// Missing, unreadable, or malformed history starts an empty collection.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }

        self.sessions = match self.backend.read() {
            Ok(Some(blob)) => match serde_json::from_str::<HistoryFile>(&blob) {
                Ok(history) => history.sessions,
                Err(e) => {
                    warn!(error = %e, "discarding malformed chat history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load chat history");
                Vec::new()
            }
        };

        debug!(sessions = self.sessions.len(), "chat history hydrated");
        self.hydrated = true;
    }

    /// Whether hydration has completed.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// All sessions, newest first.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Look up a session by id.
    #[must_use]
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// The active session id, which may reference a session that no longer exists.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active session, resolved on every call.
    #[must_use]
    pub fn active_session(&self) -> Option<&Session> {
        self.active_id.as_deref().and_then(|id| self.session(id))
    }

    /// Messages of the active session, or an empty slice.
    #[must_use]
    pub fn active_messages(&self) -> &[Message] {
        self.active_session()
            .map(|s| s.messages.as_slice())
            .unwrap_or_default()
    }

    /// Create a session named after `first_message`, make it active, and
    /// return its id.
    pub fn create_session(&mut self, first_message: &str) -> String {
        let session = Session::new(first_message, self.name_max_len);
        let id = session.id.clone();
        debug!(session_id = %id, "created session");

        self.sessions.insert(0, session);
        self.active_id = Some(id.clone());
        self.persist();
        id
    }

    /// Point the active session at `id`.
    ///
    /// Existence is not checked; an unknown id simply resolves to no active
    /// session.
    pub fn load_session(&mut self, id: &str) {
        if self.session(id).is_none() {
            debug!(session_id = %id, "loading unknown session");
        }
        self.active_id = Some(id.to_string());
    }

    /// Remove a session, clearing the active pointer if it was active.
    pub fn delete_session(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);

        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }

        if self.sessions.len() != before {
            debug!(session_id = %id, "deleted session");
            self.persist();
        }
    }

    /// Replace the active session's messages.
    ///
    /// Does nothing when no session is active.
    pub fn update_session_messages(&mut self, messages: Vec<Message>) {
        let Some(active_id) = self.active_id.as_deref() else {
            return;
        };

        let Some(session) = self.sessions.iter_mut().find(|s| s.id == active_id) else {
            return;
        };

        session.set_messages(messages);
        self.persist();
    }

    /// Append a message to a specific session.
    ///
    /// Returns `false` when the session no longer exists.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            return false;
        };

        session.push_message(message);
        self.persist();
        true
    }

    /// Clear the active pointer without touching any session.
    pub fn clear_active_session(&mut self) {
        self.active_id = None;
    }

    /// Remove sessions last updated before `cutoff`. Returns how many were removed.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.updated_at >= cutoff);
        let removed = before - self.sessions.len();

        if removed > 0 {
            if self.active_id.is_some() && self.active_session().is_none() {
                self.active_id = None;
            }
            debug!(removed, "pruned sessions");
            self.persist();
        }

        removed
    }

    /// Write the full collection back to the backend.
    fn persist(&self) {
        if !self.hydrated {
            return;
        }

        let history = HistoryFile {
            sessions: self.sessions.clone(),
        };

        let result = serde_json::to_string(&history)
            .map_err(crate::error::Error::from)
            .and_then(|blob| self.backend.write(&blob));

        if let Err(e) = result {
            warn!(error = %e, "failed to save chat history");
        }
    }
}
