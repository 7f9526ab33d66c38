//! Registry of artifacts written during a generation run.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;

/// Collects every file written during a run, grouped by category.
///
/// The category is the artifact's file extension (`java`, `hbm.xml`).
/// Recording is additive and takes `&self`, so worker threads can share one
/// collector by reference.
#[derive(Debug, Default)]
pub struct ArtifactCollector {
    files: Mutex<IndexMap<String, Vec<PathBuf>>>,
}

impl ArtifactCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written file under `category`.
    pub fn record(&self, category: &str, path: impl AsRef<Path>) {
        self.lock()
            .entry(category.to_string())
            .or_default()
            .push(path.as_ref().to_path_buf());
    }

    /// Number of files recorded under `category`.
    pub fn file_count(&self, category: &str) -> usize {
        self.lock().get(category).map_or(0, Vec::len)
    }

    /// Files recorded under `category`, in recording order.
    pub fn files(&self, category: &str) -> Vec<PathBuf> {
        self.lock().get(category).cloned().unwrap_or_default()
    }

    /// Categories in the order they were first recorded.
    pub fn categories(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Total number of files across all categories.
    pub fn total(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    // A panic while holding the lock cannot leave a half-pushed entry
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Vec<PathBuf>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
