//! # Keygen Subcommand
//!
//! Generates an RSA key pair encoded the way the service loads it: base64
//! PKCS#8 DER for the private half, base64 SubjectPublicKeyInfo DER for the
//! public half.
//!
//! Without `--output` both values are printed as environment assignments
//! ready to paste into a deployment.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use efact_crypto::{
    RsaKeyPair, DEFAULT_KEY_BITS, MIN_KEY_BITS, PRIVATE_KEY_ENV, PUBLIC_KEY_ENV,
};

/// Arguments for `efact keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Modulus size in bits.
    #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
    pub bits: usize,

    /// Write `<prefix>.key` and `<prefix>.pub` into this directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Prefix for the key filenames.
    #[arg(long, default_value = "efact")]
    pub prefix: String,
}

/// Execute the keygen subcommand.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    if args.bits < MIN_KEY_BITS {
        bail!(
            "--bits {} is below the {MIN_KEY_BITS}-bit minimum the service accepts",
            args.bits
        );
    }
    tracing::info!(bits = args.bits, "generating RSA key pair");
    let keys = RsaKeyPair::generate(args.bits).context("key generation failed")?;
    let private = keys
        .private_key_base64()
        .context("failed to encode private key")?;

    match &args.output {
        Some(dir) => write_key_files(&keys, &private, dir, &args.prefix),
        None => {
            println!("{PRIVATE_KEY_ENV}={private}");
            println!("{PUBLIC_KEY_ENV}={}", keys.public_key_base64());
            Ok(0)
        }
    }
}

fn write_key_files(keys: &RsaKeyPair, private: &str, dir: &Path, prefix: &str) -> Result<u8> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let private_path = dir.join(format!("{prefix}.key"));
    let public_path = dir.join(format!("{prefix}.pub"));

    std::fs::write(&private_path, private)
        .with_context(|| format!("failed to write private key: {}", private_path.display()))?;
    std::fs::write(&public_path, keys.public_key_base64())
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    println!("OK: generated {}-bit RSA key pair", keys.modulus_bits());
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());

    Ok(0)
}
