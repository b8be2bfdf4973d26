//! Document and chunk records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A source document submitted for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque document identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Full document text
    pub content: String,
    /// Free-form metadata (upload source, mime type, ...)
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a new document
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// With a metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Document length in Unicode scalar values
    #[inline]
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A bounded contiguous slice of a document's text
///
/// Chunks are the unit of work fed to agents. `index` is the 0-based
/// position of the chunk within its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk identifier, derived from the document id and index
    pub id: String,
    /// Owning document
    pub document_id: String,
    /// Chunk text
    pub text: String,
    /// 0-based position within the source document
    pub index: usize,
}

impl DocumentChunk {
    /// Create a chunk for `document_id` at `index`
    #[inline]
    #[must_use]
    pub fn new(document_id: impl Into<String>, index: usize, text: impl Into<String>) -> Self {
        let document_id = document_id.into();
        Self {
            id: format!("{document_id}::chunk-{index}"),
            document_id,
            text: text.into(),
            index,
        }
    }

    /// Chunk length in Unicode scalar values
    #[inline]
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Summary statistics over a chunked document set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of source documents
    pub documents: usize,
    /// Number of chunks produced
    pub chunks: usize,
    /// Total characters across all documents
    pub characters: usize,
}

impl DocumentStats {
    /// Collect stats from a document set and its chunks
    #[must_use]
    pub fn collect(documents: &[Document], chunks: &[DocumentChunk]) -> Self {
        Self {
            documents: documents.len(),
            chunks: chunks.len(),
            characters: documents.iter().map(Document::char_len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_id_is_derived_from_document_and_index() {
        let chunk = DocumentChunk::new("doc-7", 2, "text");
        assert_eq!(chunk.id, "doc-7::chunk-2");
        assert_eq!(chunk.document_id, "doc-7");
        assert_eq!(chunk.index, 2);
    }

    #[test]
    fn stats_count_characters_across_documents() {
        let docs = vec![
            Document::new("a", "a.txt", "abcd"),
            Document::new("b", "b.txt", "xy"),
        ];
        let chunks = vec![
            DocumentChunk::new("a", 0, "abcd"),
            DocumentChunk::new("b", 0, "xy"),
        ];

        let stats = DocumentStats::collect(&docs, &chunks);
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.characters, 6);
    }
}
