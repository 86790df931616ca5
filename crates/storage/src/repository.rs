use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use academy_core::model::{ModuleId, ModuleProgress, PathProgress, SectionId, SectionProgress};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

/// Persisted shape for one section's progress.
///
/// This mirrors the stored JSON layout so repositories can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer. Every field defaults so partially-written entries still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgressRecord {
    #[serde(default)]
    pub checkbox_states: Vec<bool>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Persisted shape for one module's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgressRecord {
    #[serde(default)]
    pub completed_sections: BTreeMap<String, SectionProgressRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Persisted shape for a whole path: a map from module id to module record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PathProgressRecord {
    pub modules: BTreeMap<String, ModuleProgressRecord>,
}

impl PathProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &PathProgress) -> Self {
        let modules = progress
            .modules()
            .map(|(module_id, module)| {
                let completed_sections = module
                    .sections()
                    .map(|(section_id, section)| {
                        (
                            section_id.as_str().to_owned(),
                            SectionProgressRecord {
                                checkbox_states: section.checkbox_states().to_vec(),
                                progress: section.percent(),
                                completed_at: section.completed_at(),
                            },
                        )
                    })
                    .collect();
                (
                    module_id.as_str().to_owned(),
                    ModuleProgressRecord {
                        completed_sections,
                        completed_at: module.completed_at(),
                    },
                )
            })
            .collect();
        Self { modules }
    }

    /// Convert the record back into domain progress.
    ///
    /// Lenient by design: the stored percent is recomputed from the checkbox
    /// states, and entries with blank ids are dropped rather than failing the
    /// whole load.
    #[must_use]
    pub fn into_progress(self) -> PathProgress {
        let mut modules = BTreeMap::new();
        for (module_key, module_record) in self.modules {
            if module_key.trim().is_empty() {
                continue;
            }
            let mut sections = BTreeMap::new();
            for (section_key, section_record) in module_record.completed_sections {
                if section_key.trim().is_empty() {
                    continue;
                }
                sections.insert(
                    SectionId::new(section_key),
                    SectionProgress::from_persisted(
                        section_record.checkbox_states,
                        section_record.completed_at,
                    ),
                );
            }
            modules.insert(
                ModuleId::new(module_key),
                ModuleProgress::from_persisted(sections, module_record.completed_at),
            );
        }
        PathProgress::from_persisted(modules)
    }
}

//
// ─── REPOSITORY CONTRACT ───────────────────────────────────────────────────────
//

/// Repository contract for persisted path progress.
///
/// Keys are fully namespaced (`"<namespace>:<pathId>"`); the fail-open
/// policy lives one layer up in [`crate::store::ProgressStore`].
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the payload
    /// cannot be decoded. A missing entry is `Ok(None)`, not an error.
    async fn load(&self, key: &str) -> Result<Option<PathProgressRecord>, StorageError>;

    /// Overwrite the record stored under `key`. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, key: &str, record: &PathProgressRecord) -> Result<(), StorageError>;

    /// Remove the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn reset(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, PathProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load(&self, key: &str) -> Result<Option<PathProgressRecord>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save(&self, key: &str, record: &PathProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), record.clone());
        Ok(())
    }

    async fn reset(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the progress repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
