//! Content resolution for sections.
//!
//! Renderable content is registered against a registry at three levels of
//! specificity and resolved most-specific-first. Total resolution failure is
//! an expected outcome, not an error: the fallback is a placeholder built
//! from the section's catalog description.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use academy_core::model::{Catalog, ModuleId, PathId, SectionId};

/// Inputs handed to a content factory.
#[derive(Debug, Clone)]
pub struct SectionContext<'a> {
    pub path: &'a PathId,
    pub module: &'a ModuleId,
    pub section: &'a SectionId,
    pub title: &'a str,
    pub description: Option<&'a str>,
}

/// Produces the rendered body for a section, or `None` to decline and let
/// resolution fall through to the next candidate.
pub type ContentFactory = Arc<dyn Fn(&SectionContext<'_>) -> Option<String> + Send + Sync>;

/// Which candidate level produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentSource {
    Section,
    Module,
    Path,
    Placeholder,
}

/// Resolved content for one section, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedContent {
    pub source: ContentSource,
    pub title: String,
    pub body: String,
}

const PLACEHOLDER_NOTICE: &str = "This section's content is not yet available.";

/// Registry of content factories keyed by section, module, or path.
///
/// Registration happens once at startup; resolution is read-only after that.
pub struct ContentRegistry {
    catalog: Arc<Catalog>,
    by_section: HashMap<(PathId, ModuleId, SectionId), ContentFactory>,
    by_module: HashMap<(PathId, ModuleId), ContentFactory>,
    by_path: HashMap<PathId, ContentFactory>,
}

impl ContentRegistry {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            by_section: HashMap::new(),
            by_module: HashMap::new(),
            by_path: HashMap::new(),
        }
    }

    /// Registers content for one specific section.
    pub fn register_section(
        &mut self,
        path: PathId,
        module: ModuleId,
        section: SectionId,
        factory: impl Fn(&SectionContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) {
        self.by_section
            .insert((path, module, section), Arc::new(factory));
    }

    /// Registers fallback content for every section of a module.
    pub fn register_module(
        &mut self,
        path: PathId,
        module: ModuleId,
        factory: impl Fn(&SectionContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) {
        self.by_module.insert((path, module), Arc::new(factory));
    }

    /// Registers last-resort content for every section of a path.
    pub fn register_path(
        &mut self,
        path: PathId,
        factory: impl Fn(&SectionContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) {
        self.by_path.insert(path, Arc::new(factory));
    }

    /// Resolves content for a section, most specific candidate first.
    ///
    /// Never fails: when every candidate misses or declines, the placeholder
    /// renders the section's catalog description with a
    /// content-not-yet-available notice. Unknown ids resolve to the
    /// placeholder too.
    #[must_use]
    pub fn resolve(
        &self,
        path: &PathId,
        module: &ModuleId,
        section: &SectionId,
    ) -> ResolvedContent {
        let definition = self
            .catalog
            .path(path)
            .and_then(|p| p.section(module, section));
        let title = definition.map_or_else(|| section.as_str().to_owned(), |s| s.title().to_owned());
        let description = definition.and_then(|s| s.description());

        let context = SectionContext {
            path,
            module,
            section,
            title: &title,
            description,
        };

        let candidates: [(ContentSource, Option<&ContentFactory>); 3] = [
            (
                ContentSource::Section,
                self.by_section
                    .get(&(path.clone(), module.clone(), section.clone())),
            ),
            (
                ContentSource::Module,
                self.by_module.get(&(path.clone(), module.clone())),
            ),
            (ContentSource::Path, self.by_path.get(path)),
        ];

        for (source, factory) in candidates {
            if let Some(body) = factory.and_then(|f| f(&context)) {
                return ResolvedContent {
                    source,
                    title,
                    body,
                };
            }
        }

        let mut body = String::new();
        if let Some(description) = description {
            body.push_str(description);
            body.push_str("\n\n");
        }
        body.push_str(PLACEHOLDER_NOTICE);

        ResolvedContent {
            source: ContentSource::Placeholder,
            title,
            body,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
