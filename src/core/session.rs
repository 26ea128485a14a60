//! Chat session data model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default maximum session name length, in characters.
pub const DEFAULT_NAME_MAX_LEN: usize = 50;

/// Marker appended to truncated session names.
const ELLIPSIS: &str = "...";

/// One saved conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Generated identifier, immutable.
    pub id: String,

    /// Display label derived from the first user message.
    pub name: String,

    /// Exchanged messages in insertion order.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// When the session was created (epoch milliseconds on disk).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// When the message list last changed (epoch milliseconds on disk).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session named after its first message.
    #[must_use]
    pub fn new(first_message: &str, name_max_len: usize) -> Self {
        let now = now_millis();
        Self {
            id: generate_id(now),
            name: truncate_name(first_message, name_max_len),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the message list and refresh `updated_at`.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.updated_at = now_millis();
    }

    /// Append a message and refresh `updated_at`.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = now_millis();
    }

    /// Most recent assistant result, if any.
    #[must_use]
    pub fn last_result(&self) -> Option<(usize, &AnalysisResult)> {
        self.messages
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, m)| m.result().map(|r| (i, r)))
    }
}

/// A single chat message.
///
/// User messages carry the raw submitted text; assistant messages carry the
/// structured analysis plus the prompt that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Text submitted by the user.
    User {
        /// Raw submitted text.
        content: String,
    },

    /// Analysis returned by the service.
    Assistant {
        /// Structured analysis result.
        content: AnalysisResult,

        /// Original user text, used to regenerate.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
}

impl Message {
    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Build an assistant message for the given prompt.
    #[must_use]
    pub fn assistant(content: AnalysisResult, prompt: impl Into<String>) -> Self {
        Self::Assistant {
            content,
            prompt: Some(prompt.into()),
        }
    }

    /// Whether this message came from the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// The analysis result, for assistant messages.
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Assistant { content, .. } => Some(content),
            Self::User { .. } => None,
        }
    }

    /// The stored prompt, for assistant messages that have one.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::Assistant { prompt, .. } => prompt.as_deref(),
            Self::User { .. } => None,
        }
    }
}

/// Classification returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sentiment label.
    pub sentiment: String,

    /// Confidence in `[0, 1]`.
    pub confidence: f64,

    /// Labels from each comparison model.
    pub model_comparison: ModelComparison,
}

impl AnalysisResult {
    /// Whether the confidence lies in `[0, 1]`.
    #[must_use]
    pub fn has_valid_confidence(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

/// Per-model labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Naive Bayes label.
    pub naive_bayes: String,

    /// Logistic regression label.
    pub logistic_regression: String,
}

impl ModelComparison {
    /// Whether both models produced the same label.
    #[must_use]
    pub fn agree(&self) -> bool {
        self.naive_bayes == self.logistic_regression
    }
}

/// Derive a session name from its first message.
///
/// Inputs longer than `max_len` characters keep exactly `max_len` characters
/// followed by `...`.
#[must_use]
pub fn truncate_name(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Current time at millisecond precision, matching the on-disk format.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn generate_id(now: DateTime<Utc>) -> String {
    let entropy = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", now.timestamp_millis(), &entropy[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            sentiment: "Ethical Concern".to_string(),
            confidence: 0.87,
            model_comparison: ModelComparison {
                naive_bayes: "Ethical Concern".to_string(),
                logistic_regression: "Economic Anxiety".to_string(),
            },
        }
    }

    #[test]
    fn session_new() {
        let session = Session::new("hello", DEFAULT_NAME_MAX_LEN);
        assert_eq!(session.name, "hello");
        assert!(session.id.starts_with("session_"));
        assert!(session.messages.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn session_ids_are_unique() {
        let a = Session::new("a", DEFAULT_NAME_MAX_LEN);
        let b = Session::new("a", DEFAULT_NAME_MAX_LEN);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn truncate_short_name_unchanged() {
        let text = "x".repeat(50);
        assert_eq!(truncate_name(&text, 50), text);
    }

    #[test]
    fn truncate_long_name() {
        let text = "I am worried that AI surveillance will destroy our privacy";
        let name = truncate_name(text, 50);
        assert_eq!(name, "I am worried that AI surveillance will destroy our...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        let name = truncate_name(&text, 50);
        assert_eq!(name, format!("{}...", "é".repeat(50)));
    }

    #[test]
    fn user_message_serialization() {
        let message = Message::user("hi there");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi there"}));
    }

    #[test]
    fn assistant_message_serialization() {
        let message = Message::assistant(sample_result(), "the prompt");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["prompt"], "the prompt");
        assert_eq!(value["content"]["sentiment"], "Ethical Concern");
        assert_eq!(
            value["content"]["model_comparison"]["logistic_regression"],
            "Economic Anxiety"
        );
    }

    #[test]
    fn assistant_message_without_prompt_parses() {
        let raw = r#"{"role":"assistant","content":{"sentiment":"Optimism","confidence":0.5,
            "model_comparison":{"naive_bayes":"Optimism","logistic_regression":"Optimism"}}}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert!(message.prompt().is_none());
        assert_eq!(message.result().unwrap().sentiment, "Optimism");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let raw = r#"{"role":"system","content":"nope"}"#;
        assert!(serde_json::from_str::<Message>(raw).is_err());
    }

    #[test]
    fn session_uses_camel_case_epoch_millis() {
        let session = Session::new("hello", DEFAULT_NAME_MAX_LEN);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["createdAt"], json!(session.created_at.timestamp_millis()));
        assert_eq!(value["updatedAt"], json!(session.updated_at.timestamp_millis()));
    }

    #[test]
    fn session_round_trip_is_lossless() {
        let mut session = Session::new("round trip", DEFAULT_NAME_MAX_LEN);
        session.push_message(Message::user("round trip"));
        session.push_message(Message::assistant(sample_result(), "round trip"));

        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn last_result_finds_latest_assistant() {
        let mut session = Session::new("q", DEFAULT_NAME_MAX_LEN);
        assert!(session.last_result().is_none());

        session.push_message(Message::user("q"));
        session.push_message(Message::assistant(sample_result(), "q"));
        session.push_message(Message::user("again"));

        let (index, result) = session.last_result().unwrap();
        assert_eq!(index, 1);
        assert_eq!(result.sentiment, "Ethical Concern");
    }

    #[test]
    fn model_agreement() {
        let mut result = sample_result();
        assert!(!result.model_comparison.agree());
        result.model_comparison.logistic_regression = "Ethical Concern".to_string();
        assert!(result.model_comparison.agree());
    }

    #[test]
    fn confidence_range_check() {
        let mut result = sample_result();
        assert!(result.has_valid_confidence());
        result.confidence = 1.2;
        assert!(!result.has_valid_confidence());
        result.confidence = f64::NAN;
        assert!(!result.has_valid_confidence());
    }

    proptest! {
        #[test]
        fn truncation_keeps_at_most_max_chars(text in ".{0,120}", max_len in 1usize..80) {
            let name = truncate_name(&text, max_len);
            let len = text.chars().count();
            if len <= max_len {
                prop_assert_eq!(name, text);
            } else {
                prop_assert!(name.ends_with(ELLIPSIS));
                let kept: String = text.chars().take(max_len).collect();
                prop_assert_eq!(name, format!("{kept}{ELLIPSIS}"));
            }
        }
    }
}
