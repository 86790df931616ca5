use std::sync::Arc;

use academy_core::Clock;
use academy_core::model::Catalog;
use storage::repository::Storage;
use storage::store::ProgressStore;

use crate::error::AppServicesError;
use crate::progress::ProgressService;
use crate::resolver::ContentRegistry;

/// Assembles the app-facing services over one catalog and one storage
/// backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    content: Arc<ContentRegistry>,
}

impl AppServices {
    /// Build services backed by in-memory storage. Progress lives for the
    /// session only.
    #[must_use]
    pub fn in_memory(catalog: Arc<Catalog>, content: ContentRegistry, clock: Clock) -> Self {
        Self::assemble(catalog, content, clock, Storage::in_memory())
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails. Once
    /// bootstrapped, later persistence faults degrade to in-memory operation
    /// instead of surfacing.
    pub async fn sqlite(
        db_url: &str,
        catalog: Arc<Catalog>,
        content: ContentRegistry,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(catalog, content, clock, storage))
    }

    fn assemble(
        catalog: Arc<Catalog>,
        content: ContentRegistry,
        clock: Clock,
        storage: Storage,
    ) -> Self {
        let store = ProgressStore::new(storage.progress);
        let progress = Arc::new(ProgressService::new(catalog, store, clock));
        Self {
            progress,
            content: Arc::new(content),
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentRegistry> {
        Arc::clone(&self.content)
    }
}
