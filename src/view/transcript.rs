//! Tracks what part of the active conversation has been rendered.
//!
//! The store owns the messages. The view only remembers which session it
//! last showed and how many of its messages are already on screen, and resets
//! only when the active session's identity changes.

use crate::core::session::Message;
use crate::core::store::SessionStore;

/// What the view should do to catch up with the store.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptUpdate<'a> {
    /// Active session changed (or its list was replaced): redraw everything.
    Reset {
        /// Newly active session, if any.
        session_id: Option<&'a str>,
        /// All of its messages.
        messages: &'a [Message],
    },

    /// Same session; these messages are new.
    Append(&'a [Message]),

    /// Nothing changed.
    Unchanged,
}

/// Rendered-state tracker for one terminal view.
#[derive(Debug, Default)]
pub struct TranscriptView {
    session_id: Option<String>,
    rendered: usize,
}

impl TranscriptView {
    /// Create a view that has rendered nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages already rendered.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Compare with the store and advance the rendered state.
    pub fn sync<'a>(&mut self, store: &'a SessionStore) -> TranscriptUpdate<'a> {
        let active = store.active_session();
        let active_id = active.map(|s| s.id.as_str());
        let messages = store.active_messages();

        if active_id != self.session_id.as_deref() || messages.len() < self.rendered {
            self.session_id = active_id.map(str::to_string);
            self.rendered = messages.len();
            return TranscriptUpdate::Reset {
                session_id: active_id,
                messages,
            };
        }

        if messages.len() == self.rendered {
            return TranscriptUpdate::Unchanged;
        }

        let fresh = &messages[self.rendered..];
        self.rendered = messages.len();
        TranscriptUpdate::Append(fresh)
    }
}
