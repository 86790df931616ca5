use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::engine::rounded_percent;
use crate::model::ids::{ModuleId, SectionId};

//
// ─── SECTION PROGRESS ──────────────────────────────────────────────────────────
//

/// Completion state of one section: its checkbox states, the percent derived
/// from them, and the moment the section first reached 100%.
///
/// `percent` is always recomputed from `checkbox_states`; it is never settable
/// on its own. A section with no checkboxes reports 100% only once it has been
/// explicitly marked complete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionProgress {
    checkbox_states: Vec<bool>,
    percent: u8,
    completed_at: Option<DateTime<Utc>>,
}

impl SectionProgress {
    /// Fresh progress for a section with the given number of checkboxes.
    #[must_use]
    pub fn new(checkbox_count: u32) -> Self {
        Self {
            checkbox_states: vec![false; checkbox_count as usize],
            percent: 0,
            completed_at: None,
        }
    }

    /// Rehydrate from persisted state.
    ///
    /// The stored percent is discarded and recomputed from the checkbox
    /// states, so a drifted or hand-edited value cannot violate the
    /// percent/checkbox invariant.
    #[must_use]
    pub fn from_persisted(
        checkbox_states: Vec<bool>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut progress = Self {
            checkbox_states,
            percent: 0,
            completed_at,
        };
        progress.percent = progress.derived_percent();
        progress
    }

    #[must_use]
    pub fn checkbox_states(&self) -> &[bool] {
        &self.checkbox_states
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        self.percent
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }

    /// Number of checked checkboxes.
    #[must_use]
    pub fn checked_count(&self) -> u32 {
        let checked = self.checkbox_states.iter().filter(|state| **state).count();
        u32::try_from(checked).unwrap_or(u32::MAX)
    }

    /// Flips the checkbox at `index` and recomputes the percent, stamping
    /// `completed_at` the first time the section reaches 100%.
    ///
    /// Returns `false` (without touching any state) if `index` is out of
    /// range.
    pub fn toggle_checkbox(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        let Some(state) = self.checkbox_states.get_mut(index) else {
            return false;
        };
        *state = !*state;
        self.recompute(now);
        true
    }

    /// Sets the checkbox at `index` to `value` and recomputes the percent.
    ///
    /// Returns `false` (without touching any state) if `index` is out of
    /// range.
    pub fn set_checkbox(&mut self, index: usize, value: bool, now: DateTime<Utc>) -> bool {
        let Some(state) = self.checkbox_states.get_mut(index) else {
            return false;
        };
        *state = value;
        self.recompute(now);
        true
    }

    /// Force-completes the section: every checkbox set, percent 100,
    /// `completed_at` stamped if unset.
    ///
    /// Idempotent: repeat calls do not refresh the timestamp. This is the
    /// only way a section without checkboxes reaches 100%.
    pub fn mark_complete(&mut self, now: DateTime<Utc>) {
        for state in &mut self.checkbox_states {
            *state = true;
        }
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.percent = self.derived_percent();
    }

    /// Reconciles persisted state with the catalog's checkbox count, resizing
    /// the state vector and recomputing the percent. `completed_at` is
    /// preserved.
    pub fn normalize(&mut self, checkbox_count: u32) {
        self.checkbox_states.resize(checkbox_count as usize, false);
        self.percent = self.derived_percent();
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        self.percent = self.derived_percent();
        if self.percent == 100 && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    fn derived_percent(&self) -> u8 {
        if self.checkbox_states.is_empty() {
            return if self.completed_at.is_some() { 100 } else { 0 };
        }
        let total = u32::try_from(self.checkbox_states.len()).unwrap_or(u32::MAX);
        rounded_percent(self.checked_count(), total)
    }
}

//
// ─── MODULE PROGRESS ───────────────────────────────────────────────────────────
//

/// Per-module aggregate: the sparse map of started sections plus the moment
/// every section of the module first reached 100%.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleProgress {
    sections: BTreeMap<SectionId, SectionProgress>,
    completed_at: Option<DateTime<Utc>>,
}

impl ModuleProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted state.
    #[must_use]
    pub fn from_persisted(
        sections: BTreeMap<SectionId, SectionProgress>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            sections,
            completed_at,
        }
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&SectionProgress> {
        self.sections.get(id)
    }

    /// Section entry, created (and normalized against `checkbox_count`) on
    /// first access.
    pub fn ensure_section(
        &mut self,
        id: &SectionId,
        checkbox_count: u32,
    ) -> &mut SectionProgress {
        let entry = self
            .sections
            .entry(id.clone())
            .or_insert_with(|| SectionProgress::new(checkbox_count));
        entry.normalize(checkbox_count);
        entry
    }

    /// Iterates started sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = (&SectionId, &SectionProgress)> {
        self.sections.iter()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Stamps the module completion timestamp once; later calls keep the
    /// original stamp.
    pub fn stamp_completed(&mut self, now: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.completed_at.is_none()
    }
}

//
// ─── PATH PROGRESS ─────────────────────────────────────────────────────────────
//

/// All recorded progress for one learning path; the unit of persistence.
///
/// Created empty on first access and fully cleared only by an explicit
/// reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathProgress {
    modules: BTreeMap<ModuleId, ModuleProgress>,
}

impl PathProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted state.
    #[must_use]
    pub fn from_persisted(modules: BTreeMap<ModuleId, ModuleProgress>) -> Self {
        Self { modules }
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&ModuleProgress> {
        self.modules.get(id)
    }

    pub fn module_mut(&mut self, id: &ModuleId) -> Option<&mut ModuleProgress> {
        self.modules.get_mut(id)
    }

    /// Module entry, created empty on first access.
    pub fn ensure_module(&mut self, id: &ModuleId) -> &mut ModuleProgress {
        self.modules.entry(id.clone()).or_default()
    }

    /// Section entry, created (and normalized) on first access.
    pub fn ensure_section(
        &mut self,
        module: &ModuleId,
        section: &SectionId,
        checkbox_count: u32,
    ) -> &mut SectionProgress {
        self.ensure_module(module).ensure_section(section, checkbox_count)
    }

    #[must_use]
    pub fn section(&self, module: &ModuleId, section: &SectionId) -> Option<&SectionProgress> {
        self.modules.get(module)?.section(section)
    }

    /// Iterates modules with recorded progress in id order.
    pub fn modules(&self) -> impl Iterator<Item = (&ModuleId, &ModuleProgress)> {
        self.modules.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.values().all(ModuleProgress::is_empty)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
