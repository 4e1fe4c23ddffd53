//! # efact-cli — Command-Line Interface
//!
//! Provides the `efact` binary for working with documents offline, without
//! the HTTP service.
//!
//! ## Subcommands
//!
//! - `efact keygen` — Generate an RSA key pair in the service's encoding.
//! - `efact canonicalize` — Print a document's canonical signed content and
//!   its digest.
//! - `efact validate` — Run the consistency checks.
//! - `efact sign` — Validate, then sign, producing a validation record.
//! - `efact verify` — Check a signature with the public key alone.
//!
//! ```bash
//! efact keygen --output keys
//! efact sign invoice.json --private-key-file keys/efact.key --public-key-file keys/efact.pub
//! efact verify invoice.json --public-key-file keys/efact.pub
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success. `1` when a document is rejected, a signature does not
//! verify, or the command itself fails.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to the domain crates. No validation or signing logic
//!   lives here.

pub mod document;
pub mod keys;
pub mod signing;

use std::path::Path;

use anyhow::{bail, Context, Result};
use efact_core::Document;

/// Read and parse a JSON document from disk.
pub fn read_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        bail!("document file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse document: {}", path.display()))
}

/// Read a base64 key file, trimmed.
pub fn read_key_file(path: &Path, which: &str) -> Result<String> {
    if !path.exists() {
        bail!("{which} key file not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {which} key: {}", path.display()))?;
    Ok(text.trim().to_string())
}
