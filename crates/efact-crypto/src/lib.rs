//! # efact-crypto — Document Signature Protocol
//!
//! Binds a document's exact content to a signature that any holder of the
//! public key can check:
//!
//! - **RSA key pairs** loaded from base64 PKCS#8 / SubjectPublicKeyInfo DER,
//!   with a startup check that the two halves belong together.
//! - **RSASSA-PKCS1-v1_5** over the SHA-256 digest of the document's
//!   `CanonicalBytes`. Signature tokens are standard base64.
//! - **Public-key-only verification** through `DocumentVerifier`, for
//!   parties that never hold the private key.
//! - **Key providers** that source the encoded pair from the environment or
//!   from memory.
//!
//! ## Crate Policy
//!
//! - Depends only on `efact-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   `CanonicalBytes`, real SHA-256, real RSA.
//! - Verification answers `bool` and never propagates an error.

pub mod key_provider;
pub mod rsa_keys;
pub mod signer;

pub use key_provider::{
    EncodedKeyPair, EnvKeyProvider, KeyProvider, StaticKeyProvider, PRIVATE_KEY_ENV,
    PUBLIC_KEY_ENV,
};
pub use rsa_keys::{RsaKeyPair, DEFAULT_KEY_BITS, MIN_KEY_BITS};
pub use signer::{DocumentSigner, DocumentVerifier, SIGNATURE_ALGORITHM};
