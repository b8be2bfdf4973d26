//! Error types for document handling

/// Chunker errors
#[derive(Debug, thiserror::Error)]
pub enum ChunkerError {
    /// Chunking parameters are unusable
    #[error("invalid chunking configuration: {0}")]
    InvalidConfiguration(String),
}

/// Document source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The project reference could not be resolved
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The backing store failed
    #[error("document backend error: {0}")]
    Backend(String),
}
