//! # efact-service — Document Processing
//!
//! Ties the validation engine and the signature protocol together behind
//! two operations:
//!
//! - [`DocumentProcessor::process_for_validation_and_signature()`]: validate
//!   a document and, if consistent, sign it. Returns the verdict record.
//! - [`DocumentProcessor::verify_document_signature()`]: check a
//!   document-plus-signature pair. Always answers `bool`.
//!
//! [`DocumentProcessor::process_document()`] runs the first operation on a
//! document fetched from a [`DocumentStore`] and persists the result.
//!
//! Processing outcomes are counted through the `metrics` facade; see
//! [`counters`].

pub mod counters;
pub mod processor;
pub mod store;

pub use processor::{DocumentProcessor, ProcessError};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
