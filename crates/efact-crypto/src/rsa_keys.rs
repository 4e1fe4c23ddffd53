//! # RSA Key Pairs
//!
//! Loads and generates the RSA key pair that signs documents.
//!
//! ## Encoding
//!
//! - Private key: PKCS#8 DER, base64 (standard alphabet, padded).
//! - Public key: SubjectPublicKeyInfo (X.509) DER, base64.
//!
//! Whitespace inside the base64 text is ignored, so values copied out of a
//! wrapped PEM body load unchanged.
//!
//! ## Security Invariant
//!
//! Private key material is never logged and never appears in `Debug` output.
//! `RsaKeyPair` does not implement `Serialize`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use efact_core::CryptoError;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Default modulus size for generated keys.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus accepted when loading a signing key pair.
pub const MIN_KEY_BITS: usize = DEFAULT_KEY_BITS;

/// The service's active signing key pair.
pub struct RsaKeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
    public_base64: String,
}

impl RsaKeyPair {
    /// Load a key pair from base64 PKCS#8 (private) and SPKI (public) DER.
    ///
    /// # Errors
    ///
    /// `CryptoError::KeyLoadFailure` if either value is not base64, does not
    /// decode as the expected structure, the public key does not belong to
    /// the private key, or the modulus is shorter than [`MIN_KEY_BITS`].
    pub fn from_base64(private_pkcs8: &str, public_spki: &str) -> Result<Self, CryptoError> {
        let private_der = decode_key_text(private_pkcs8, "private")?;
        let private = RsaPrivateKey::from_pkcs8_der(&private_der)
            .map_err(|e| CryptoError::KeyLoadFailure(format!("invalid PKCS#8 private key: {e}")))?;
        let (public, public_base64) = decode_public_key(public_spki)?;

        if private.to_public_key() != public {
            return Err(CryptoError::KeyLoadFailure(
                "public key does not match private key".to_string(),
            ));
        }

        let bits = public.size() * 8;
        if bits < MIN_KEY_BITS {
            return Err(CryptoError::KeyLoadFailure(format!(
                "{bits}-bit modulus is below the {MIN_KEY_BITS}-bit minimum"
            )));
        }

        Ok(Self {
            private,
            public,
            public_base64,
        })
    }

    /// Generate a fresh key pair from the OS CSPRNG.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
            .map_err(|e| CryptoError::KeyLoadFailure(format!("key generation failed: {e}")))?;
        let public = private.to_public_key();
        let public_der = public
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyLoadFailure(format!("public key encoding failed: {e}")))?;
        Ok(Self {
            public_base64: STANDARD.encode(public_der.as_bytes()),
            private,
            public,
        })
    }

    /// The public key as base64 SPKI DER.
    pub fn public_key_base64(&self) -> &str {
        &self.public_base64
    }

    /// The private key as base64 PKCS#8 DER. Used only to export freshly
    /// generated keys.
    pub fn private_key_base64(&self) -> Result<String, CryptoError> {
        let der = self
            .private
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyLoadFailure(format!("private key encoding failed: {e}")))?;
        Ok(STANDARD.encode(der.as_bytes()))
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.public.size() * 8
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub(crate) fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }
}

impl std::fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = &self.public_base64[self.public_base64.len().saturating_sub(12)..];
        f.debug_struct("RsaKeyPair")
            .field("modulus_bits", &self.modulus_bits())
            .field("public_key", &format_args!("...{suffix}"))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Decode a base64 SPKI public key. Returns the key and its normalized
/// base64 text.
pub(crate) fn decode_public_key(public_spki: &str) -> Result<(RsaPublicKey, String), CryptoError> {
    let der = decode_key_text(public_spki, "public")?;
    let key = RsaPublicKey::from_public_key_der(&der).map_err(|e| {
        CryptoError::KeyLoadFailure(format!("invalid SubjectPublicKeyInfo public key: {e}"))
    })?;
    Ok((key, STANDARD.encode(&der)))
}

fn decode_key_text(text: &str, which: &str) -> Result<Vec<u8>, CryptoError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(CryptoError::KeyLoadFailure(format!("{which} key is empty")));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CryptoError::KeyLoadFailure(format!("{which} key is not valid base64: {e}")))
}
