//! # Monetary Amounts — Exact Decimals with a Pinned Text Form
//!
//! Defines `Amount`, the exact-decimal type used for every monetary and
//! quantity field of a document.
//!
//! ## Canonical Numeric Rule
//!
//! Signatures must cover a byte-stable rendering of every number. `Amount`
//! serializes as a JSON **string** holding the normalized decimal:
//!
//! - trailing fractional zeros removed (`20.00` → `"20"`, `3.60` → `"3.6"`),
//! - no exponent, no leading `+`,
//! - negative zero rendered as `"0"`.
//!
//! Numerically equal amounts therefore always produce identical text, and
//! no binary float ever reaches `CanonicalBytes` (which rejects floats).
//!
//! ## Accepted Input
//!
//! Deserialization accepts either a JSON string (`"23.60"`) or a JSON number
//! (`23.6`, `2.36e1`). Numbers are read from their literal JSON text and never
//! pass through `f64`, so `23.6000000000000000001` stays distinct from `23.6`.
//! A value that cannot be held exactly (more than 28 significant digits, or
//! out of range) is rejected rather than rounded.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::EfactError;

/// An exact decimal amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wrap a decimal value.
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Access the inner decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Render the amount in canonical text form (see module docs).
    pub fn canonical_string(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Returns true if the amount is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Read an amount from one JSON value's literal text: a string holding a
    /// decimal, or a number.
    fn from_json_text(text: &str) -> Result<Self, EfactError> {
        match text.as_bytes().first() {
            Some(b'"') => {
                let inner: String = serde_json::from_str(text)
                    .map_err(|e| EfactError::InvalidAmount(format!("{text}: {e}")))?;
                inner.parse()
            }
            Some(b'-' | b'0'..=b'9') => Self::from_number_literal(text),
            _ => Err(EfactError::InvalidAmount(format!(
                "expected a decimal string or number, got {text}"
            ))),
        }
    }

    fn from_number_literal(text: &str) -> Result<Self, EfactError> {
        let invalid = |reason: &str| EfactError::InvalidAmount(format!("{text}: {reason}"));

        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => {
                let exponent: i64 = text[i + 1..]
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| invalid("malformed exponent"))?;
                (&text[..i], exponent)
            }
            None => (text, 0),
        };

        let mut value = Decimal::from_str_exact(mantissa)
            .map_err(|_| invalid("not exactly representable"))?;

        if value.is_zero() {
            return Ok(Self(Decimal::ZERO));
        }
        if exponent < 0 {
            let scale = u32::try_from(exponent.unsigned_abs())
                .ok()
                .and_then(|shift| value.scale().checked_add(shift))
                .ok_or_else(|| invalid("exponent out of range"))?;
            value
                .set_scale(scale)
                .map_err(|_| invalid("not exactly representable"))?;
        } else {
            if exponent > i64::from(MAX_EXPONENT) {
                return Err(invalid("exponent out of range"));
            }
            for _ in 0..exponent {
                value = value
                    .checked_mul(Decimal::TEN)
                    .ok_or_else(|| invalid("out of range"))?;
            }
        }
        Ok(Self(value))
    }
}

/// Largest power of ten a non-zero `Decimal` can be scaled by.
const MAX_EXPONENT: u32 = 28;

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = EfactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim())
            .map(Self)
            .map_err(|e| EfactError::InvalidAmount(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Amount::from_json_text(raw.get().trim()).map_err(de::Error::custom)
    }
}
