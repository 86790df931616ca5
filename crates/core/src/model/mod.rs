mod catalog;
mod ids;
mod progress;

pub use catalog::{Catalog, CatalogError, Difficulty, LearningPath, Module, Section, SectionRef};
pub use ids::{ModuleId, PathId, SectionId};
pub use progress::{ModuleProgress, PathProgress, SectionProgress};
