//! # Canonical Serialization — JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used as a
//! hash input anywhere in efact.
//!
//! ## Security Invariant
//!
//! The inner field is private. The only constructor is `CanonicalBytes::new()`,
//! which rejects binary floats and then serializes with the JSON
//! Canonicalization Scheme (RFC 8785). Signing and verification both accept
//! `&CanonicalBytes`, so they cannot disagree about the hash input.
//!
//! ## Rules
//!
//! 1. **Reject floats.** Any non-integer JSON number fails with
//!    `FloatRejected`. Document amounts serialize as decimal strings
//!    (see [`crate::amount`]), so they never trip this rule.
//! 2. **Sorted keys.** Object keys are emitted in lexicographic order, which
//!    fixes the field order independently of struct declaration order.
//! 3. **Compact separators**, UTF-8, no insignificant whitespace.
//! 4. **Absent optionals are omitted**, not emitted as `null`, when the type
//!    uses `skip_serializing_if`. The document's `validation` field relies on
//!    this.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numbers are integers; decimals travel as strings.
/// - Object keys are sorted, separators are compact (RFC 8785).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let bytes = serialize_canonical(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the canonical bytes as text. JCS output is always UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and fail on the first non-integer number.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}
