//! In-memory storage backend for testing.

use crate::error::{Error, Result};
use crate::storage::traits::HistoryStore;
use std::io;
use std::sync::{Arc, RwLock};

/// In-memory history storage for testing.
///
/// Clones share the same underlying blob, so a test can keep a handle while
/// the session store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    blob: Option<String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    /// Create a new, empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-loaded with a stored blob.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.inner.write().unwrap().blob = Some(blob.into());
        backend
    }

    /// Current stored blob.
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.inner.read().unwrap().blob.clone()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.read().unwrap().writes
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.write().unwrap().fail_reads = fail;
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.write().unwrap().fail_writes = fail;
    }
}

impl HistoryStore for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        if inner.fail_reads {
            return Err(Error::Storage(io::Error::other("simulated read failure")));
        }
        Ok(inner.blob.clone())
    }

    fn write(&self, blob: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(Error::Storage(io::Error::other("simulated write failure")));
        }
        inner.blob = Some(blob.to_string());
        inner.writes += 1;
        Ok(())
    }
}
