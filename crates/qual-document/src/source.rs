//! Document repository abstraction
//!
//! The processor depends on this trait rather than any concrete storage,
//! so a real database can be swapped in without touching call sites.

use crate::document::Document;
use crate::error::SourceError;
use dashmap::DashMap;

/// Resolves the documents belonging to a project
///
/// An empty result is a valid, expected case; callers decide whether an
/// empty project is an error.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch all documents for `project_id`, in repository order
    async fn project_documents(&self, project_id: &str) -> Result<Vec<Document>, SourceError>;
}

/// In-memory document repository
///
/// Projects map to ordered document lists. Unknown projects resolve to an
/// empty list rather than an error.
#[derive(Debug, Default)]
pub struct InMemorySource {
    projects: DashMap<String, Vec<Document>>,
}

impl InMemorySource {
    /// Create an empty repository
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document list for a project
    pub fn insert_project(&self, project_id: impl Into<String>, documents: Vec<Document>) {
        self.projects.insert(project_id.into(), documents);
    }

    /// Append a document to a project
    pub fn push_document(&self, project_id: impl Into<String>, document: Document) {
        self.projects
            .entry(project_id.into())
            .or_default()
            .push(document);
    }

    /// Number of projects held
    #[inline]
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

#[async_trait::async_trait]
impl DocumentSource for InMemorySource {
    async fn project_documents(&self, project_id: &str) -> Result<Vec<Document>, SourceError> {
        Ok(self
            .projects
            .get(project_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
