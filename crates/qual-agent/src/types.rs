//! Agent identifiers and raw result records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ulid::Ulid;

/// Agent identifier
///
/// An opaque user-facing methodology slug such as `grounded-theory`.
/// Hyphen-separated words title-case into the methodology display label.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Create an agent id from a slug
    #[inline]
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The raw slug
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Methodology display label: title-cased hyphen-separated words
    ///
    /// `grounded-theory` becomes `Grounded Theory`.
    #[must_use]
    pub fn methodology(&self) -> String {
        self.0
            .split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

/// Unique result identifier (ULID for sortability)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ResultId(pub Ulid);

impl ResultId {
    /// Generate new result ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw per-chunk agent output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    /// Result identifier
    pub id: ResultId,
    /// Generated insight text
    pub text: String,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Source document, when known
    pub document_id: Option<String>,
    /// Source chunk, when known
    pub chunk_id: Option<String>,
    /// Free-form metadata
    pub metadata: BTreeMap<String, String>,
}

impl AgentResult {
    /// Create a result with the given text and confidence
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: ResultId::new(),
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            document_id: None,
            chunk_id: None,
            metadata: BTreeMap::new(),
        }
    }

    /// With source chunk provenance
    #[inline]
    #[must_use]
    pub fn with_provenance(
        mut self,
        document_id: impl Into<String>,
        chunk_id: impl Into<String>,
    ) -> Self {
        self.document_id = Some(document_id.into());
        self.chunk_id = Some(chunk_id.into());
        self
    }

    /// With a metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
