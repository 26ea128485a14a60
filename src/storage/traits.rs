//! Storage trait definitions.

use crate::error::Result;

/// Durable storage for the serialized chat history.
///
/// The history is a single blob that is always read and written in full.
pub trait HistoryStore: Send + Sync {
    /// Read the stored blob, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn write(&self, blob: &str) -> Result<()>;
}
