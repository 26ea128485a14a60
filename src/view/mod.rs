//! Presentation: result cards, charts, and transcript tracking.

pub mod card;
pub mod transcript;

pub use card::{render_card, summary_text};
pub use transcript::{TranscriptUpdate, TranscriptView};
