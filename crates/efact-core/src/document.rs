//! # Document Model
//!
//! The invoice-like record that the engine validates and signs, its line
//! items, and the validation record attached after processing.
//!
//! ## Signed Content
//!
//! Everything on a [`Document`] except `validation` is content and is
//! covered by the signature. `validation` is metadata produced by the
//! engine itself. [`Document::canonical_bytes()`] canonicalizes a copy with
//! that field cleared, so the hash input is identical whether the document
//! is fresh, previously validated, or previously rejected.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::CanonicalizationError;
use crate::temporal::Timestamp;

/// One invoice-like record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Externally assigned identifier, unique per store.
    pub document_id: String,
    /// External correlation token.
    #[serde(default)]
    pub uuid: String,
    /// Issuer tax id. Opaque.
    #[serde(default)]
    pub issuer_tax_id: String,
    /// Receiver tax id. Opaque.
    #[serde(default)]
    pub receiver_tax_id: String,
    /// Issuance date. Opaque.
    #[serde(default)]
    pub issue_date: String,
    /// Declared sum of item subtotals.
    pub net_amount: Amount,
    /// Declared tax.
    pub tax_amount: Amount,
    /// Declared net + tax.
    pub total_amount: Amount,
    /// Line items, in declaration order.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Verdict attached after processing. Never part of the signed content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRecord>,
}

/// One line of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub description: String,
    pub unit_price: Amount,
    pub quantity: Amount,
    /// Declared `unit_price × quantity`.
    pub line_subtotal: Amount,
    /// Declared tax on the line.
    pub line_tax: Amount,
}

impl Document {
    /// A value copy of this document with `validation` cleared.
    pub fn without_validation(&self) -> Document {
        Document {
            validation: None,
            ..self.clone()
        }
    }

    /// Canonical bytes of the signed content.
    ///
    /// Always computed over [`Document::without_validation()`]; the receiver
    /// is not modified.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&self.without_validation())
    }

    /// SHA-256 over [`Document::canonical_bytes()`].
    pub fn content_digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }

    /// Attach a verdict, replacing any previous one.
    pub fn set_validation(&mut self, record: ValidationRecord) {
        self.validation = Some(record);
    }
}

/// Outcome of processing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Totals are consistent and the document was signed.
    Valid,
    /// At least one consistency check failed.
    Invalid,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict attached to a processed document.
///
/// # Invariants
///
/// - `signature` is present iff `status` is `Valid`.
/// - `reason` is present iff `status` is `Invalid`.
///
/// Both hold for every record built through [`ValidationRecord::valid()`] or
/// [`ValidationRecord::invalid()`], the only constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    timestamp: Timestamp,
    status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ValidationRecord {
    /// A passing verdict carrying the base64 signature token.
    pub fn valid(timestamp: Timestamp, signature: impl Into<String>) -> Self {
        Self {
            timestamp,
            status: ValidationStatus::Valid,
            signature: Some(signature.into()),
            reason: None,
        }
    }

    /// A failing verdict carrying the human-readable reason.
    pub fn invalid(timestamp: Timestamp, reason: impl Into<String>) -> Self {
        Self {
            timestamp,
            status: ValidationStatus::Invalid,
            signature: None,
            reason: Some(reason.into()),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}
