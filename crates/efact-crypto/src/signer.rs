//! # Document Signing Protocol
//!
//! Sign: canonicalize the document without its validation record, take the
//! SHA-256 digest, apply RSASSA-PKCS1-v1_5 (SHA-256 DigestInfo) to that
//! digest, and base64-encode the result.
//!
//! Verify: recompute the same digest from the document as received, decode
//! the token, and check it against the public key.
//!
//! The digest is computed exactly once. The PKCS#1 v1.5 primitive is handed
//! the finished digest and only prepends the DigestInfo header; it never
//! hashes again.
//!
//! ## Failure Policy
//!
//! Signing returns `CryptoError` to the caller. Verification never fails
//! outward: every problem (bad base64, wrong key, altered content) is
//! logged and reported as `false`. Use [`DocumentSigner::check()`] to get
//! the underlying reason.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use efact_core::{CryptoError, Document};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::Sha256;

use crate::rsa_keys::{decode_public_key, RsaKeyPair};

/// Identifier for the signature scheme, published alongside the public key.
pub const SIGNATURE_ALGORITHM: &str = "RS256-PKCS1v15";

/// Signs and verifies documents with one immutable key pair.
///
/// Cheap to clone; clones share the key pair.
#[derive(Debug, Clone)]
pub struct DocumentSigner {
    keys: Arc<RsaKeyPair>,
    verifier: DocumentVerifier,
}

impl DocumentSigner {
    pub fn new(keys: RsaKeyPair) -> Self {
        Self::from_shared(Arc::new(keys))
    }

    pub fn from_shared(keys: Arc<RsaKeyPair>) -> Self {
        let verifier = DocumentVerifier {
            public: Arc::new(keys.public_key().clone()),
            public_base64: Arc::from(keys.public_key_base64()),
        };
        Self { keys, verifier }
    }

    /// The public half, as base64 SPKI DER.
    pub fn public_key_base64(&self) -> &str {
        self.keys.public_key_base64()
    }

    /// A verifier for this signer's public key.
    pub fn verifier(&self) -> &DocumentVerifier {
        &self.verifier
    }

    /// Produce a base64 signature token over the document's signed content.
    ///
    /// Any validation record the document carries is ignored.
    pub fn sign(&self, document: &Document) -> Result<String, CryptoError> {
        let digest = document.content_digest()?;
        tracing::debug!(
            document_id = %document.document_id,
            digest = %digest,
            "signing document digest"
        );

        let signature = self
            .keys
            .private_key()
            .sign(Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes())
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
        Ok(STANDARD.encode(signature))
    }

    /// See [`DocumentVerifier::verify()`].
    pub fn verify(&self, document: &Document, token: &str) -> bool {
        self.verifier.verify(document, token)
    }

    /// See [`DocumentVerifier::check()`].
    pub fn check(&self, document: &Document, token: &str) -> Result<(), CryptoError> {
        self.verifier.check(document, token)
    }
}

/// Verifies documents against a public key alone.
#[derive(Debug, Clone)]
pub struct DocumentVerifier {
    public: Arc<RsaPublicKey>,
    public_base64: Arc<str>,
}

impl DocumentVerifier {
    /// Load from a base64 SPKI DER public key.
    pub fn from_base64(public_spki: &str) -> Result<Self, CryptoError> {
        let (public, public_base64) = decode_public_key(public_spki)?;
        Ok(Self {
            public: Arc::new(public),
            public_base64: Arc::from(public_base64),
        })
    }

    pub fn public_key_base64(&self) -> &str {
        &self.public_base64
    }

    /// True iff `token` is a valid signature over the document's signed
    /// content under this public key.
    pub fn verify(&self, document: &Document, token: &str) -> bool {
        match self.check(document, token) {
            Ok(()) => true,
            Err(CryptoError::VerificationFailed(reason)) => {
                tracing::warn!(
                    document_id = %document.document_id,
                    %reason,
                    "signature does not match document"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    document_id = %document.document_id,
                    error = %e,
                    "signature could not be checked"
                );
                false
            }
        }
    }

    /// Like [`DocumentVerifier::verify()`], but reports why a check failed.
    pub fn check(&self, document: &Document, token: &str) -> Result<(), CryptoError> {
        let signature = STANDARD
            .decode(token.trim().as_bytes())
            .map_err(|e| CryptoError::Base64Decode(e.to_string()))?;
        let digest = document.content_digest()?;
        tracing::debug!(
            document_id = %document.document_id,
            digest = %digest,
            "verifying document digest"
        );
        self.public
            .verify(Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes(), &signature)
            .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
    }
}
