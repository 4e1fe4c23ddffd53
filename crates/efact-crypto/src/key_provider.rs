//! # Key Provider Abstraction
//!
//! Abstracts where the encoded key pair comes from:
//!
//! - [`EnvKeyProvider`]: reads base64 key material from environment
//!   variables. Suitable for container deployments where secrets are
//!   injected via environment.
//! - [`StaticKeyProvider`]: in-memory strings, for tests and for keys read
//!   from files by the CLI.
//!
//! Providers hand out encoded text only. Decoding and the pair-match check
//! happen once, in [`KeyProvider::load_key_pair()`].

use efact_core::CryptoError;

use crate::rsa_keys::RsaKeyPair;

/// Default environment variable holding the base64 PKCS#8 private key.
pub const PRIVATE_KEY_ENV: &str = "EFACT_SIGNING_PRIVATE_KEY";

/// Default environment variable holding the base64 SPKI public key.
pub const PUBLIC_KEY_ENV: &str = "EFACT_SIGNING_PUBLIC_KEY";

/// A base64-encoded key pair as provisioned.
#[derive(Clone)]
pub struct EncodedKeyPair {
    pub private_pkcs8: String,
    pub public_spki: String,
}

impl std::fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("private_pkcs8", &"<redacted>")
            .field("public_spki", &self.public_spki)
            .finish()
    }
}

/// Source of the service's signing key pair.
///
/// Implementations must be `Send + Sync` for use in multi-threaded async
/// runtimes.
pub trait KeyProvider: Send + Sync {
    /// Return the encoded key pair.
    fn encoded_pair(&self) -> Result<EncodedKeyPair, CryptoError>;

    /// Human-readable name for this provider (for diagnostics/logging).
    fn provider_name(&self) -> &str;

    /// Decode and check the pair. Failure here is fatal to startup.
    fn load_key_pair(&self) -> Result<RsaKeyPair, CryptoError> {
        let encoded = self.encoded_pair()?;
        let pair = RsaKeyPair::from_base64(&encoded.private_pkcs8, &encoded.public_spki)?;
        tracing::info!(
            provider = self.provider_name(),
            modulus_bits = pair.modulus_bits(),
            "signing key pair loaded"
        );
        Ok(pair)
    }
}

// ─── EnvKeyProvider ──────────────────────────────────────────────────────

/// Reads the key pair from two environment variables.
///
/// The variables are read on every call to [`KeyProvider::encoded_pair()`];
/// callers load once at startup.
///
/// ## Example
///
/// ```bash
/// export EFACT_SIGNING_PRIVATE_KEY="MIIEvQIBADANBgkqhkiG9w0BAQEFAASC..."
/// export EFACT_SIGNING_PUBLIC_KEY="MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8A..."
/// ```
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    private_var: String,
    public_var: String,
}

impl EnvKeyProvider {
    /// Use the default variable names.
    pub fn new() -> Self {
        Self::with_vars(PRIVATE_KEY_ENV, PUBLIC_KEY_ENV)
    }

    /// Use custom variable names.
    pub fn with_vars(private_var: impl Into<String>, public_var: impl Into<String>) -> Self {
        Self {
            private_var: private_var.into(),
            public_var: public_var.into(),
        }
    }

    pub fn private_var(&self) -> &str {
        &self.private_var
    }

    pub fn public_var(&self) -> &str {
        &self.public_var
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn read_var(name: &str) -> Result<String, CryptoError> {
    std::env::var(name)
        .map_err(|_| CryptoError::KeyLoadFailure(format!("environment variable {name} not set")))
}

impl KeyProvider for EnvKeyProvider {
    fn encoded_pair(&self) -> Result<EncodedKeyPair, CryptoError> {
        Ok(EncodedKeyPair {
            private_pkcs8: read_var(&self.private_var)?,
            public_spki: read_var(&self.public_var)?,
        })
    }

    fn provider_name(&self) -> &str {
        "EnvKeyProvider"
    }
}

// ─── StaticKeyProvider ───────────────────────────────────────────────────

/// Holds an encoded key pair in memory.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    pair: EncodedKeyPair,
}

impl StaticKeyProvider {
    pub fn new(private_pkcs8: impl Into<String>, public_spki: impl Into<String>) -> Self {
        Self {
            pair: EncodedKeyPair {
                private_pkcs8: private_pkcs8.into(),
                public_spki: public_spki.into(),
            },
        }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn encoded_pair(&self) -> Result<EncodedKeyPair, CryptoError> {
        Ok(self.pair.clone())
    }

    fn provider_name(&self) -> &str {
        "StaticKeyProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys::test_key_pair;

    fn static_provider() -> StaticKeyProvider {
        let keys = test_key_pair();
        StaticKeyProvider::new(keys.private_key_base64().unwrap(), keys.public_key_base64())
    }

    #[test]
    fn static_provider_loads() {
        let pair = static_provider().load_key_pair().unwrap();
        assert_eq!(pair.public_key_base64(), test_key_pair().public_key_base64());
    }

    #[test]
    fn provider_names() {
        assert_eq!(static_provider().provider_name(), "StaticKeyProvider");
        assert_eq!(EnvKeyProvider::new().provider_name(), "EnvKeyProvider");
    }

    #[test]
    fn env_provider_defaults() {
        let provider = EnvKeyProvider::default();
        assert_eq!(provider.private_var(), PRIVATE_KEY_ENV);
        assert_eq!(provider.public_var(), PUBLIC_KEY_ENV);
    }

    #[test]
    fn env_provider_reads_custom_vars() {
        let keys = test_key_pair();
        let private_var = "EFACT_TEST_KP_READS_PRIVATE";
        let public_var = "EFACT_TEST_KP_READS_PUBLIC";
        std::env::set_var(private_var, keys.private_key_base64().unwrap());
        std::env::set_var(public_var, keys.public_key_base64());

        let pair = EnvKeyProvider::with_vars(private_var, public_var)
            .load_key_pair()
            .unwrap();
        assert_eq!(pair.public_key_base64(), keys.public_key_base64());
    }

    #[test]
    fn env_provider_missing_var_is_key_load_failure() {
        let provider = EnvKeyProvider::with_vars(
            "EFACT_TEST_KP_MISSING_PRIVATE",
            "EFACT_TEST_KP_MISSING_PUBLIC",
        );
        let err = provider.load_key_pair().unwrap_err();
        assert!(matches!(err, CryptoError::KeyLoadFailure(_)));
        assert!(err.to_string().contains("EFACT_TEST_KP_MISSING_PRIVATE"));
    }

    #[test]
    fn encoded_pair_debug_redacts_private() {
        let provider = StaticKeyProvider::new("SECRETSECRET", "PUBLIC");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("SECRETSECRET"));
        assert!(debug.contains("PUBLIC"));
    }
}
