use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use academy_core::model::{PathId, PathProgress};

use crate::repository::{PathProgressRecord, ProgressRepository};

/// Default key namespace for persisted progress entries.
pub const DEFAULT_NAMESPACE: &str = "progress";

/// Fail-open persistence front for path progress.
///
/// The store keeps the authoritative in-memory snapshot per path and treats
/// the repository as a best-effort mirror: a missing, malformed, or erroring
/// backend degrades to in-memory-only operation for the session. No
/// operation here fails — losing persistence is not a correctness-critical
/// failure for this tool, so faults are logged and swallowed.
#[derive(Clone)]
pub struct ProgressStore {
    repository: Arc<dyn ProgressRepository>,
    namespace: String,
    snapshots: Arc<Mutex<HashMap<PathId, PathProgress>>>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repository,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Overrides the key namespace (`"<namespace>:<pathId>"`).
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Storage key for a path.
    #[must_use]
    pub fn key(&self, path: &PathId) -> String {
        format!("{}:{}", self.namespace, path)
    }

    /// Returns the progress snapshot for `path`.
    ///
    /// The first call per path reads through to the repository; later calls
    /// serve the in-memory snapshot, which this store owns for the lifetime
    /// of the session. Absent, malformed, or unreadable persisted state loads
    /// as empty progress.
    pub async fn load(&self, path: &PathId) -> PathProgress {
        if let Some(snapshot) = self.snapshots_guard().get(path) {
            return snapshot.clone();
        }

        let loaded = match self.repository.load(&self.key(path)).await {
            Ok(Some(record)) => record.into_progress(),
            Ok(None) => PathProgress::new(),
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "failed to load persisted progress; starting empty");
                PathProgress::new()
            }
        };

        self.snapshots_guard().insert(path.clone(), loaded.clone());
        loaded
    }

    /// Replaces the snapshot for `path` and writes it through.
    ///
    /// A write failure leaves the in-memory snapshot in place, so the session
    /// keeps working; the loss only becomes visible on the next cold load.
    pub async fn save(&self, path: &PathId, progress: &PathProgress) {
        self.snapshots_guard()
            .insert(path.clone(), progress.clone());

        let record = PathProgressRecord::from_progress(progress);
        if let Err(err) = self.repository.save(&self.key(path), &record).await {
            tracing::warn!(path = %path, error = %err, "failed to persist progress; continuing in memory");
        }
    }

    /// Clears all progress for `path`, in memory and in the repository.
    /// Irreversible.
    pub async fn reset(&self, path: &PathId) {
        self.snapshots_guard().remove(path);

        if let Err(err) = self.repository.reset(&self.key(path)).await {
            tracing::warn!(path = %path, error = %err, "failed to clear persisted progress");
        }
    }

    // A poisoned lock still holds usable data; recover rather than fail.
    fn snapshots_guard(&self) -> MutexGuard<'_, HashMap<PathId, PathProgress>> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
