use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a learning path (e.g. `bitcoin`, `lightning`, `liquid`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathId(String);

impl PathId {
    /// Creates a new `PathId` from a slug, trimming surrounding whitespace.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into().trim().to_owned())
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier for a module within a learning path (e.g. `bitcoin-fundamentals`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates a new `ModuleId` from a slug, trimming surrounding whitespace.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into().trim().to_owned())
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier for a section within a module (e.g. `what-is-bitcoin`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Creates a new `SectionId` from a slug, trimming surrounding whitespace.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into().trim().to_owned())
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathId({})", self.0)
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_id_display() {
        let id = PathId::new("bitcoin");
        assert_eq!(id.to_string(), "bitcoin");
    }

    #[test]
    fn path_id_trims_whitespace() {
        let id = PathId::new("  lightning  ");
        assert_eq!(id.as_str(), "lightning");
    }

    #[test]
    fn module_id_display() {
        let id = ModuleId::new("bitcoin-fundamentals");
        assert_eq!(id.to_string(), "bitcoin-fundamentals");
    }

    #[test]
    fn section_id_equality() {
        assert_eq!(SectionId::new("what-is-bitcoin"), SectionId::new("what-is-bitcoin"));
        assert_ne!(SectionId::new("what-is-bitcoin"), SectionId::new("the-blockchain"));
    }

    #[test]
    fn ids_order_lexicographically() {
        assert!(ModuleId::new("a-module") < ModuleId::new("b-module"));
    }
}
