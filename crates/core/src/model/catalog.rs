use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{ModuleId, PathId, SectionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("identifier is empty or contains reserved characters: {raw:?}")]
    InvalidId { raw: String },

    #[error("title cannot be empty for {id}")]
    EmptyTitle { id: String },

    #[error("module {id} has no sections")]
    EmptySections { id: ModuleId },

    #[error("path {id} has no modules")]
    EmptyModules { id: PathId },

    #[error("duplicate section id {id} in module {module}")]
    DuplicateSection { module: ModuleId, id: SectionId },

    #[error("duplicate module id {id} in path {path}")]
    DuplicateModule { path: PathId, id: ModuleId },

    #[error("duplicate path id {id}")]
    DuplicatePath { id: PathId },
}

// Ids key persisted storage entries, so the separator and whitespace are reserved.
fn validate_slug(raw: &str) -> Result<&str, CatalogError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) || trimmed.contains(':') {
        return Err(CatalogError::InvalidId {
            raw: raw.to_owned(),
        });
    }
    Ok(trimmed)
}

fn validate_title(title: String, id: &str) -> Result<String, CatalogError> {
    let title = title.trim().to_owned();
    if title.is_empty() {
        return Err(CatalogError::EmptyTitle { id: id.to_owned() });
    }
    Ok(title)
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "Beginner"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// The smallest content unit, gated by a fixed number of verification
/// checkboxes.
///
/// A `checkbox_count` of zero means the section has no checkpoints and is
/// completed only by an explicit mark-complete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    description: Option<String>,
    checkbox_count: u32,
}

impl Section {
    /// Creates a new section definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidId` for an empty or reserved-character id,
    /// or `CatalogError::EmptyTitle` for a whitespace-only title.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        checkbox_count: u32,
    ) -> Result<Self, CatalogError> {
        let raw = id.into();
        let slug = validate_slug(&raw)?;
        let title = validate_title(title.into(), slug)?;

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: SectionId::new(slug),
            title,
            description,
            checkbox_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn checkbox_count(&self) -> u32 {
        self.checkbox_count
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// A themed group of sections within a path, tagged with a difficulty tier.
///
/// Section order is significant: it defines the prerequisite chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    difficulty: Difficulty,
    sections: Vec<Section>,
}

impl Module {
    /// Creates a new module definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the id or title is invalid, the section list
    /// is empty, or two sections share an id.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        difficulty: Difficulty,
        sections: Vec<Section>,
    ) -> Result<Self, CatalogError> {
        let raw = id.into();
        let slug = validate_slug(&raw)?;
        let title = validate_title(title.into(), slug)?;
        let id = ModuleId::new(slug);

        if sections.is_empty() {
            return Err(CatalogError::EmptySections { id });
        }
        for (i, section) in sections.iter().enumerate() {
            if sections[..i].iter().any(|other| other.id() == section.id()) {
                return Err(CatalogError::DuplicateSection {
                    module: id.clone(),
                    id: section.id().clone(),
                });
            }
        }

        Ok(Self {
            id,
            title,
            difficulty,
            sections,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }
}

//
// ─── LEARNING PATH ─────────────────────────────────────────────────────────────
//

/// Names one section of a path by its module and section ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    pub module: ModuleId,
    pub section: SectionId,
}

impl SectionRef {
    #[must_use]
    pub fn new(module: ModuleId, section: SectionId) -> Self {
        Self { module, section }
    }
}

/// A top-level content track: an ordered list of modules whose flattened
/// section sequence defines the prerequisite chain for the whole path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPath {
    id: PathId,
    title: String,
    modules: Vec<Module>,
}

impl LearningPath {
    /// Creates a new learning path definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the id or title is invalid, the module list
    /// is empty, or two modules share an id.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        modules: Vec<Module>,
    ) -> Result<Self, CatalogError> {
        let raw = id.into();
        let slug = validate_slug(&raw)?;
        let title = validate_title(title.into(), slug)?;
        let id = PathId::new(slug);

        if modules.is_empty() {
            return Err(CatalogError::EmptyModules { id });
        }
        for (i, module) in modules.iter().enumerate() {
            if modules[..i].iter().any(|other| other.id() == module.id()) {
                return Err(CatalogError::DuplicateModule {
                    path: id.clone(),
                    id: module.id().clone(),
                });
            }
        }

        Ok(Self { id, title, modules })
    }

    #[must_use]
    pub fn id(&self) -> &PathId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn section(&self, module: &ModuleId, section: &SectionId) -> Option<&Section> {
        self.module(module)?.section(section)
    }

    /// Iterates every section of the path in catalog order, crossing module
    /// boundaries.
    pub fn section_refs(&self) -> impl Iterator<Item = (&Module, &Section)> {
        self.modules
            .iter()
            .flat_map(|m| m.sections().iter().map(move |s| (m, s)))
    }

    /// Ordinal position of a section in the flattened path sequence.
    #[must_use]
    pub fn ordinal(&self, module: &ModuleId, section: &SectionId) -> Option<usize> {
        self.section_refs()
            .position(|(m, s)| m.id() == module && s.id() == section)
    }

    /// Section at the given flattened ordinal, if any.
    #[must_use]
    pub fn section_at(&self, ordinal: usize) -> Option<(&Module, &Section)> {
        self.section_refs().nth(ordinal)
    }

    /// Total number of sections across all modules.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.modules.iter().map(|m| m.sections().len()).sum()
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The full, read-only content catalog: every learning path the product
/// offers. Validated at construction and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    paths: Vec<LearningPath>,
}

impl Catalog {
    /// Creates a catalog from an ordered list of paths.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicatePath` if two paths share an id.
    pub fn new(paths: Vec<LearningPath>) -> Result<Self, CatalogError> {
        for (i, path) in paths.iter().enumerate() {
            if paths[..i].iter().any(|other| other.id() == path.id()) {
                return Err(CatalogError::DuplicatePath {
                    id: path.id().clone(),
                });
            }
        }
        Ok(Self { paths })
    }

    #[must_use]
    pub fn paths(&self) -> &[LearningPath] {
        &self.paths
    }

    #[must_use]
    pub fn path(&self, id: &PathId) -> Option<&LearningPath> {
        self.paths.iter().find(|p| p.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
