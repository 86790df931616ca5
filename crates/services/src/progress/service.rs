use std::sync::Arc;

use academy_core::Clock;
use academy_core::engine;
use academy_core::model::{
    Catalog, LearningPath, Module, ModuleId, PathId, PathProgress, SectionId, SectionRef,
};
use storage::store::ProgressStore;

use super::view::{ModuleProgressView, PathOverview, SectionProgressView, SectionUpdate};

enum Mutation {
    Toggle(usize),
    Set(usize, bool),
    Complete,
}

/// Orchestrates checkbox mutations and aggregate reads over one catalog.
///
/// Every operation is total: unknown paths, modules, or sections degrade to
/// zeroed defaults, out-of-range checkbox indices are ignored, and the store
/// underneath never surfaces persistence faults. A learner's session keeps
/// working no matter what; the worst outcome is progress that silently fails
/// to survive a restart.
#[derive(Clone)]
pub struct ProgressService {
    catalog: Arc<Catalog>,
    store: ProgressStore,
    clock: Clock,
}

impl ProgressService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, store: ProgressStore, clock: Clock) -> Self {
        Self {
            catalog,
            store,
            clock,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    /// Flips the checkbox at `checkbox_index` for a section and persists the
    /// result.
    ///
    /// The first time the section reaches 100% its completion timestamp is
    /// stamped from this service's clock; the stamp is never refreshed. An
    /// out-of-range index is ignored (logged in development via `tracing`),
    /// since the UI generates indices from the same catalog this service
    /// reads.
    pub async fn update_section_progress(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
        checkbox_index: usize,
    ) -> SectionUpdate {
        self.apply(path, module, section, Mutation::Toggle(checkbox_index))
            .await
    }

    /// Sets the checkbox at `checkbox_index` to an explicit value. Same
    /// semantics as [`Self::update_section_progress`] otherwise.
    pub async fn set_checkbox(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
        checkbox_index: usize,
        value: bool,
    ) -> SectionUpdate {
        self.apply(path, module, section, Mutation::Set(checkbox_index, value))
            .await
    }

    /// Force-completes a section: all checkboxes set, percent 100, timestamp
    /// stamped if unset. The only way a section without checkboxes reaches
    /// 100%. Idempotent with respect to the timestamp.
    pub async fn mark_section_complete(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
    ) -> SectionUpdate {
        self.apply(path, module, section, Mutation::Complete).await
    }

    /// Clears all recorded progress for the path. Irreversible.
    pub async fn reset_progress(&self, path: &PathId) {
        self.store.reset(path).await;
    }

    async fn apply(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
        mutation: Mutation,
    ) -> SectionUpdate {
        let Some(path_def) = self.catalog.path(path) else {
            tracing::debug!(%path, "mutation for unknown path ignored");
            return SectionUpdate::default();
        };
        let Some(section_def) = path_def.section(module, section) else {
            tracing::debug!(%path, %module, %section, "mutation for unknown section ignored");
            return SectionUpdate::default();
        };

        let now = self.clock.now();
        let mut snapshot = self.store.load(path).await;
        let entry = snapshot.ensure_section(module, section, section_def.checkbox_count());
        let was_complete = entry.is_complete();

        let applied = match mutation {
            Mutation::Toggle(index) => entry.toggle_checkbox(index, now),
            Mutation::Set(index, value) => entry.set_checkbox(index, value, now),
            Mutation::Complete => {
                entry.mark_complete(now);
                true
            }
        };
        if !applied {
            tracing::debug!(%path, %module, %section, "checkbox index out of range; ignoring");
            return Self::update_for(path_def, &snapshot, module, section, false);
        }

        let newly_completed = !was_complete && entry.is_complete();

        if engine::module_is_complete(path_def, &snapshot, module) {
            if let Some(module_progress) = snapshot.module_mut(module) {
                module_progress.stamp_completed(now);
            }
        }

        self.store.save(path, &snapshot).await;
        Self::update_for(path_def, &snapshot, module, section, newly_completed)
    }

    fn update_for(
        path_def: &LearningPath,
        snapshot: &PathProgress,
        module: &ModuleId,
        section: &SectionId,
        newly_completed: bool,
    ) -> SectionUpdate {
        SectionUpdate {
            section_percent: engine::section_percent(path_def, snapshot, module, section),
            module_percent: engine::module_percent(path_def, snapshot, module),
            path_percent: engine::path_percent(path_def, snapshot),
            newly_completed,
            completed_at: snapshot
                .section(module, section)
                .and_then(|recorded| recorded.completed_at()),
        }
    }

    //
    // ─── READS ─────────────────────────────────────────────────────────────────
    //

    /// Current percent of a section; 0 for unstarted or unknown sections.
    pub async fn section_percent(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
    ) -> u8 {
        let Some(path_def) = self.catalog.path(path) else {
            return 0;
        };
        let snapshot = self.store.load(path).await;
        engine::section_percent(path_def, &snapshot, module, section)
    }

    /// Lock decision for a section. The first section of a path is never
    /// locked; every other section is locked while its predecessor in the
    /// flattened path order sits below 100%.
    pub async fn is_section_locked(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
    ) -> bool {
        let Some(path_def) = self.catalog.path(path) else {
            return false;
        };
        let snapshot = self.store.load(path).await;
        engine::is_section_locked(path_def, &snapshot, module, section)
    }

    /// First unlocked section below 100%, in catalog order; `None` when the
    /// path is complete or unknown.
    pub async fn next_incomplete_section(&self, path: &PathId) -> Option<SectionRef> {
        let path_def = self.catalog.path(path)?;
        let snapshot = self.store.load(path).await;
        engine::next_incomplete_section(path_def, &snapshot)
    }

    /// Aggregate view of one module, or `None` for unknown ids.
    pub async fn module_progress(
        &self,
        path: &PathId,
        module: &ModuleId,
    ) -> Option<ModuleProgressView> {
        let path_def = self.catalog.path(path)?;
        let module_def = path_def.module(module)?;
        let snapshot = self.store.load(path).await;
        Some(Self::module_view(path_def, &snapshot, module_def))
    }

    /// Aggregate view of a whole path, or `None` for an unknown path.
    pub async fn path_overview(&self, path: &PathId) -> Option<PathOverview> {
        let path_def = self.catalog.path(path)?;
        let snapshot = self.store.load(path).await;

        let next = engine::next_incomplete_section(path_def, &snapshot);
        Some(PathOverview {
            id: path_def.id().clone(),
            title: path_def.title().to_owned(),
            percent: engine::path_percent(path_def, &snapshot),
            is_complete: next.is_none(),
            next,
            modules: path_def
                .modules()
                .iter()
                .map(|module_def| Self::module_view(path_def, &snapshot, module_def))
                .collect(),
        })
    }

    fn module_view(
        path_def: &LearningPath,
        snapshot: &PathProgress,
        module_def: &Module,
    ) -> ModuleProgressView {
        let sections = module_def
            .sections()
            .iter()
            .map(|section_def| {
                let recorded = snapshot.section(module_def.id(), section_def.id());
                let mut checkbox_states = recorded
                    .map(|r| r.checkbox_states().to_vec())
                    .unwrap_or_default();
                checkbox_states.resize(section_def.checkbox_count() as usize, false);

                SectionProgressView {
                    id: section_def.id().clone(),
                    title: section_def.title().to_owned(),
                    checkbox_count: section_def.checkbox_count(),
                    checkbox_states,
                    percent: engine::section_percent(
                        path_def,
                        snapshot,
                        module_def.id(),
                        section_def.id(),
                    ),
                    completed_at: recorded.and_then(|r| r.completed_at()),
                    locked: engine::is_section_locked(
                        path_def,
                        snapshot,
                        module_def.id(),
                        section_def.id(),
                    ),
                }
            })
            .collect();

        ModuleProgressView {
            id: module_def.id().clone(),
            title: module_def.title().to_owned(),
            difficulty: module_def.difficulty(),
            percent: engine::module_percent(path_def, snapshot, module_def.id()),
            completed_at: snapshot
                .module(module_def.id())
                .and_then(|m| m.completed_at()),
            sections,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
