//! # Document Processor
//!
//! The two exposed operations, plus processing of a stored document by id.
//!
//! A document that passes validation is signed and receives a `VALID`
//! record carrying the token. A document that fails receives an `INVALID`
//! record carrying the reason and no signature. If signing fails after
//! validation passed, nothing is attached and nothing is persisted.

use std::sync::Arc;

use efact_core::{CryptoError, Document, Timestamp, ValidationRecord};
use efact_crypto::DocumentSigner;
use efact_validation::{ValidationEngine, Verdict};
use thiserror::Error;

use crate::counters;
use crate::store::{DocumentStore, StoreError};

/// Errors from processing a document.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// No stored document has the requested id.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The document validated but could not be signed.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// The store could not read or write the document.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates, signs, and verifies documents.
///
/// Cheap to clone; clones share the signer and the store.
#[derive(Clone)]
pub struct DocumentProcessor {
    engine: ValidationEngine,
    signer: DocumentSigner,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for DocumentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProcessor")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl DocumentProcessor {
    pub fn new(signer: DocumentSigner, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            engine: ValidationEngine::new(),
            signer,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Base64 SPKI public key that verifies this processor's signatures.
    pub fn public_key_base64(&self) -> &str {
        self.signer.public_key_base64()
    }

    /// Run the consistency checks only.
    pub fn validate(&self, document: &Document) -> Verdict {
        self.engine.validate(document)
    }

    /// Validate the document and, if it passes, sign it.
    ///
    /// The document is not modified; the caller attaches the returned
    /// record. Any record the document already carries is ignored.
    pub fn process_for_validation_and_signature(
        &self,
        document: &Document,
    ) -> Result<ValidationRecord, ProcessError> {
        let record = match self.engine.validate(document) {
            Verdict::Valid => {
                let token = self.signer.sign(document).map_err(|e| {
                    tracing::error!(
                        document_id = %document.document_id,
                        error = %e,
                        "document validated but signing failed"
                    );
                    counters::signing_failed();
                    e
                })?;
                ValidationRecord::valid(Timestamp::now(), token)
            }
            Verdict::Invalid(rejection) => {
                ValidationRecord::invalid(Timestamp::now(), rejection.to_string())
            }
        };

        tracing::info!(
            document_id = %document.document_id,
            status = %record.status(),
            "document processed"
        );
        counters::document_processed(record.status());
        Ok(record)
    }

    /// True iff `signature` was produced over this document's content by the
    /// active key pair. Never fails outward.
    pub fn verify_document_signature(&self, document: &Document, signature: &str) -> bool {
        let valid = self.signer.verify(document, signature);
        tracing::info!(
            document_id = %document.document_id,
            valid,
            "signature verification"
        );
        counters::signature_verified(valid);
        valid
    }

    /// Fetch a stored document, process it, attach the record, and persist.
    ///
    /// On signing failure the stored document is left unmodified.
    pub fn process_document(&self, document_id: &str) -> Result<ValidationRecord, ProcessError> {
        let mut document = self
            .store
            .find_by_document_id(document_id)?
            .ok_or_else(|| ProcessError::NotFound(document_id.to_string()))?;

        let record = self.process_for_validation_and_signature(&document)?;
        document.set_validation(record.clone());
        self.store.save(document)?;
        Ok(record)
    }
}
