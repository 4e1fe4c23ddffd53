//! # efact-core — Foundational Types for the Invoice Integrity Engine
//!
//! This crate is the leaf of the efact workspace. It defines the document
//! model and the primitives every other crate builds on. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Exact decimals for money.** `Amount` wraps `rust_decimal::Decimal`.
//!    Binary floats never enter validation arithmetic or hash inputs.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!
//! 3. **Validation metadata is outside the signed content.**
//!    `Document::canonical_bytes()` always canonicalizes a copy with the
//!    `validation` field cleared, so reprocessing never changes the hash.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is UTC with Z suffix and seconds
//!    precision.
//!
//! 5. **`sha256_digest()` accepts only `&CanonicalBytes`.**
//!
//! ## Crate Policy
//!
//! - No dependencies on other `efact-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod canonical;
pub mod digest;
pub mod document;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use document::{Document, Item, ValidationRecord, ValidationStatus};
pub use error::{CanonicalizationError, CryptoError, EfactError};
pub use temporal::Timestamp;
