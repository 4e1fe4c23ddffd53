//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the efact workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A failed consistency check is NOT an error. It is a normal outcome
//!   reported by the validation engine as a verdict.
//! - Key-load and signing failures are errors and carry full context.
//! - Verification never surfaces an error to its caller; the protocol maps
//!   every `CryptoError` on that path to `false`.

use thiserror::Error;

/// Top-level error type for the efact workspace.
#[derive(Error, Debug)]
pub enum EfactError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// A value could not be read as an exact decimal amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be serialized as decimal strings.
    #[error("float values are not permitted in canonical representations; use a decimal string for amount: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key material is absent, not valid base64, not a valid PKCS#8 /
    /// SubjectPublicKeyInfo encoding, or the two halves do not match.
    /// Fatal at startup.
    #[error("key load failure: {0}")]
    KeyLoadFailure(String),

    /// The signing backend rejected the operation. Fatal for the request.
    #[error("signing failure: {0}")]
    SigningFailure(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// A signature token was not valid base64.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// The document could not be canonicalized for hashing.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
