//! Documents and chunking for the QualAgents pipeline
//!
//! Provides the inputs of every analysis batch:
//! - Source documents and their metadata
//! - Fixed-size overlapping chunk windows (the unit of agent work)
//! - The `DocumentSource` repository abstraction

#![warn(unreachable_pub)]

pub mod chunker;
pub mod document;
pub mod error;
pub mod source;

pub use chunker::{Chunker, ChunkerConfig};
pub use document::{Document, DocumentChunk, DocumentStats};
pub use error::{ChunkerError, SourceError};
pub use source::{DocumentSource, InMemorySource};
