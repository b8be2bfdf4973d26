//! Sliding-window document chunking
//!
//! Splits document text into overlapping fixed-size character windows.
//! Offsets are Unicode scalar values, so a window never splits a code
//! point.

use crate::document::{Document, DocumentChunk};
use crate::error::ChunkerError;
use serde::{Deserialize, Serialize};

/// Chunker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window width in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive windows
    pub overlap: usize,
}

impl ChunkerConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With window width
    #[inline]
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// With window overlap
    #[inline]
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Window advance per step
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `ChunkerError::InvalidConfiguration` when `chunk_size` is
    /// zero or `overlap` is not strictly smaller than `chunk_size`.
    pub fn validate(&self) -> Result<(), ChunkerError> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkerError::InvalidConfiguration(format!(
                "overlap {} must be smaller than chunk_size {}",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// Sliding-window chunker
///
/// Pure over its inputs; construction fails on an invalid configuration
/// so no batch state is touched before the parameters are known good.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a chunker with a validated configuration
    ///
    /// # Errors
    /// Returns `ChunkerError::InvalidConfiguration` for unusable
    /// parameters.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk a document set
    ///
    /// Chunk indices restart at 0 for each document; document order is
    /// preserved.
    #[must_use]
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        for document in documents {
            self.chunk_document(document, &mut chunks);
        }
        chunks
    }

    /// Chunk one document into `out`
    ///
    /// A document no longer than `chunk_size` yields exactly one chunk
    /// holding the whole text. Longer documents produce windows whose
    /// start offsets advance by `chunk_size - overlap` until the start
    /// passes the end of the text; the final window may be shorter.
    fn chunk_document(&self, document: &Document, out: &mut Vec<DocumentChunk>) {
        let byte_offsets: Vec<usize> = document.content.char_indices().map(|(i, _)| i).collect();
        let len = byte_offsets.len();

        if len <= self.config.chunk_size {
            out.push(DocumentChunk::new(&document.id, 0, &document.content));
            return;
        }

        let stride = self.config.stride();
        let mut index = 0;
        let mut start = 0;
        while start < len {
            let end = (start + self.config.chunk_size).min(len);
            let byte_start = byte_offsets[start];
            let byte_end = byte_offsets
                .get(end)
                .copied()
                .unwrap_or(document.content.len());
            out.push(DocumentChunk::new(
                &document.id,
                index,
                &document.content[byte_start..byte_end],
            ));
            index += 1;
            start += stride;
        }
    }
}
