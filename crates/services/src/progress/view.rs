use chrono::{DateTime, Utc};
use serde::Serialize;

use academy_core::model::{Difficulty, ModuleId, PathId, SectionId, SectionRef};

/// Read model for one section, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionProgressView {
    pub id: SectionId,
    pub title: String,
    pub checkbox_count: u32,
    pub checkbox_states: Vec<bool>,
    pub percent: u8,
    pub completed_at: Option<DateTime<Utc>>,
    pub locked: bool,
}

/// Read model for one module: its percent plus every section in catalog
/// order, started or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleProgressView {
    pub id: ModuleId,
    pub title: String,
    pub difficulty: Difficulty,
    pub percent: u8,
    pub completed_at: Option<DateTime<Utc>>,
    pub sections: Vec<SectionProgressView>,
}

/// Read model for a whole path: the landing-page aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathOverview {
    pub id: PathId,
    pub title: String,
    pub percent: u8,
    pub is_complete: bool,
    pub next: Option<SectionRef>,
    pub modules: Vec<ModuleProgressView>,
}

/// Result of a mutation, returned so the caller can re-render without a
/// second read. A mutation addressed at unknown ids returns the zeroed
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SectionUpdate {
    pub section_percent: u8,
    pub module_percent: u8,
    pub path_percent: u8,
    pub newly_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
