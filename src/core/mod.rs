//! Core types: sessions, the session store, and the chat controller.

pub mod chat;
pub mod session;
pub mod store;

pub use chat::{Chat, Completion, PendingRequest};
pub use session::{AnalysisResult, Message, ModelComparison, Session, truncate_name};
pub use store::SessionStore;
