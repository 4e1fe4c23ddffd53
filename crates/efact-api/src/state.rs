//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Cheaply cloneable; clones share the processor,
//! its signer, and its store.

use std::sync::Arc;

use efact_crypto::DocumentSigner;
use efact_service::{DocumentProcessor, DocumentStore, InMemoryDocumentStore};

#[derive(Debug, Clone)]
pub struct AppState {
    pub processor: DocumentProcessor,
}

impl AppState {
    pub fn new(processor: DocumentProcessor) -> Self {
        Self { processor }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(signer: DocumentSigner) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        Self::new(DocumentProcessor::new(signer, store))
    }
}
