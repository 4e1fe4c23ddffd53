//! # Canonicalize and Validate Subcommands
//!
//! Inspect a document without any key material: print the exact bytes a
//! signature covers, or run the consistency checks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use efact_validation::{ValidationEngine, Verdict};

/// Arguments for `efact canonicalize`.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// Path to the JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for `efact validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Print the canonical signed content, then its digest on a second line.
pub fn run_canonicalize(args: &CanonicalizeArgs) -> Result<u8> {
    let document = crate::read_document(&args.file)?;
    let canonical = document
        .canonical_bytes()
        .context("failed to canonicalize document")?;
    let digest = document
        .content_digest()
        .context("failed to canonicalize document")?;

    println!("{}", canonical.as_str());
    println!("{digest}");
    Ok(0)
}

/// Print `VALID`, or `INVALID: <reason>` and exit 1.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let document = crate::read_document(&args.file)?;
    match ValidationEngine::new().validate(&document) {
        Verdict::Valid => {
            println!("VALID");
            Ok(0)
        }
        Verdict::Invalid(rejection) => {
            println!("INVALID: {rejection}");
            Ok(1)
        }
    }
}
