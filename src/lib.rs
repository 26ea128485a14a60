//! impactwatch - terminal client for the ImpactWatch sentiment analysis service.
//!
//! Sends text to a remote classifier, renders the classification and model
//! comparison, and keeps a locally persisted history of conversations.

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
