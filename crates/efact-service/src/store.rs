//! # Document Storage Boundary
//!
//! The processor reads documents by their external id and writes them back
//! with the verdict attached. Storage schema and durability belong to the
//! implementation behind [`DocumentStore`].
//!
//! [`InMemoryDocumentStore`] keeps documents in a `DashMap` with no
//! persistence; data is lost on restart.

use std::sync::Arc;

use dashmap::DashMap;
use efact_core::Document;
use thiserror::Error;

/// Error reported by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not complete the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage for documents keyed by `documentId`.
///
/// `save` replaces any stored document with the same id (last write wins).
pub trait DocumentStore: Send + Sync {
    fn find_by_document_id(&self, document_id: &str) -> Result<Option<Document>, StoreError>;

    /// Every stored document, ordered by `documentId`.
    fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    fn save(&self, document: Document) -> Result<(), StoreError>;

    /// Remove a document. Returns `false` if no document had that id.
    fn delete(&self, document_id: &str) -> Result<bool, StoreError>;
}

/// In-memory store. Cheaply cloneable via `Arc`; all clones share the same
/// data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<DashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find_by_document_id(&self, document_id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .get(document_id)
            .map(|entry| entry.value().clone()))
    }

    fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let mut all: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.document_id.cmp(&b.document_id));
        Ok(all)
    }

    fn save(&self, document: Document) -> Result<(), StoreError> {
        self.documents.insert(document.document_id.clone(), document);
        Ok(())
    }

    fn delete(&self, document_id: &str) -> Result<bool, StoreError> {
        Ok(self.documents.remove(document_id).is_some())
    }
}
