//! File-based storage backend.

use crate::error::Result;
use crate::storage::traits::HistoryStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the history file inside the impactwatch home directory.
pub const HISTORY_FILE: &str = "chat_history.json";

/// File-based history storage with atomic writes.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a new file backend rooted at `base_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(HISTORY_FILE),
        })
    }

    /// Path of the history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, blob: &str) -> Result<()> {
        let temp = self.path.with_extension("tmp");

        fs::write(&temp, blob)?;

        // Rename is atomic, so readers never see a half-written history
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

/// Get the default impactwatch home directory.
///
/// Uses `IMPACTWATCH_HOME` environment variable if set, otherwise `~/.impactwatch`.
#[must_use]
pub fn get_impactwatch_home() -> PathBuf {
    if let Ok(home) = std::env::var("IMPACTWATCH_HOME") {
        PathBuf::from(home)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".impactwatch")
    } else {
        PathBuf::from(".impactwatch")
    }
}
