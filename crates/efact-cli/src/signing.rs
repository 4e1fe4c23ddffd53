//! # Sign and Verify Subcommands
//!
//! `sign` runs the same validate-then-sign step the service applies to a
//! stored document and prints the resulting validation record. With
//! `--attach` the record is also written back into the document file.
//!
//! `verify` needs only the public key. The signature comes from
//! `--signature`, or from the validation record the document already
//! carries.
//!
//! Key material is read from files when paths are given, otherwise from the
//! same environment variables the service uses.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use efact_core::{Document, ValidationRecord};
use efact_crypto::{
    DocumentSigner, DocumentVerifier, EnvKeyProvider, KeyProvider, StaticKeyProvider,
    PUBLIC_KEY_ENV,
};
use efact_service::{DocumentProcessor, InMemoryDocumentStore};

/// Arguments for `efact sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Path to the JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Base64 PKCS#8 private key file. Defaults to the environment.
    #[arg(long, requires = "public_key_file")]
    pub private_key_file: Option<PathBuf>,

    /// Base64 SubjectPublicKeyInfo public key file. Defaults to the
    /// environment.
    #[arg(long, requires = "private_key_file")]
    pub public_key_file: Option<PathBuf>,

    /// Write the validation record back into FILE.
    #[arg(long)]
    pub attach: bool,
}

/// Arguments for `efact verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Base64 signature token. Defaults to the one in the document's
    /// validation record.
    #[arg(long)]
    pub signature: Option<String>,

    /// Base64 SubjectPublicKeyInfo public key file.
    #[arg(long)]
    pub public_key_file: Option<PathBuf>,

    /// Base64 SubjectPublicKeyInfo public key.
    #[arg(long, env = PUBLIC_KEY_ENV, hide_env_values = true)]
    pub public_key: Option<String>,
}

/// Execute the sign subcommand.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    let mut document = crate::read_document(&args.file)?;
    let signer = load_signer(
        args.private_key_file.as_deref(),
        args.public_key_file.as_deref(),
    )?;
    let processor = DocumentProcessor::new(signer, Arc::new(InMemoryDocumentStore::new()));

    let record = processor
        .process_for_validation_and_signature(&document)
        .with_context(|| format!("failed to sign document {}", document.document_id))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("failed to encode validation record")?
    );

    let valid = record.is_valid();
    if args.attach {
        document.set_validation(record);
        write_document(&args.file, &document)?;
        tracing::info!(path = %args.file.display(), "validation record attached");
    }

    Ok(if valid { 0 } else { 1 })
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let document = crate::read_document(&args.file)?;
    let verifier = load_verifier(args.public_key_file.as_deref(), args.public_key.as_deref())?;

    let signature = match &args.signature {
        Some(signature) => signature.clone(),
        None => match document.validation.as_ref().and_then(ValidationRecord::signature) {
            Some(signature) => signature.to_string(),
            None => bail!(
                "no --signature given and document {} carries no signed validation record",
                document.document_id
            ),
        },
    };

    if verifier.verify(&document, &signature) {
        println!("OK: signature valid and document unmodified");
        Ok(0)
    } else {
        println!("FAIL: signature invalid or document modified");
        Ok(1)
    }
}

fn load_signer(
    private_key_file: Option<&Path>,
    public_key_file: Option<&Path>,
) -> Result<DocumentSigner> {
    let keys = match (private_key_file, public_key_file) {
        (Some(private), Some(public)) => StaticKeyProvider::new(
            crate::read_key_file(private, "private")?,
            crate::read_key_file(public, "public")?,
        )
        .load_key_pair(),
        (None, None) => EnvKeyProvider::new().load_key_pair(),
        _ => bail!("--private-key-file and --public-key-file must be given together"),
    }
    .context("failed to load signing key pair")?;
    Ok(DocumentSigner::new(keys))
}

fn load_verifier(
    public_key_file: Option<&Path>,
    public_key: Option<&str>,
) -> Result<DocumentVerifier> {
    let encoded = match (public_key_file, public_key) {
        (Some(path), _) => crate::read_key_file(path, "public")?,
        (None, Some(text)) => text.to_string(),
        (None, None) => bail!("no public key: pass --public-key-file or set {PUBLIC_KEY_ENV}"),
    };
    DocumentVerifier::from_base64(&encoded).context("failed to load public key")
}

fn write_document(path: &Path, document: &Document) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("failed to encode document")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write document: {}", path.display()))
}
