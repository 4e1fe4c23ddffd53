//! # efact CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use efact_cli::document::{run_canonicalize, run_validate, CanonicalizeArgs, ValidateArgs};
use efact_cli::keys::{run_keygen, KeygenArgs};
use efact_cli::signing::{run_sign, run_verify, SignArgs, VerifyArgs};

/// efact — invoice integrity toolchain.
///
/// Checks that a document's amounts are internally consistent, signs
/// consistent documents, and verifies signatures offline.
#[derive(Parser, Debug)]
#[command(name = "efact", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an RSA signing key pair.
    Keygen(KeygenArgs),

    /// Print the canonical signed content of a document and its digest.
    Canonicalize(CanonicalizeArgs),

    /// Check a document's line and header amounts for consistency.
    Validate(ValidateArgs),

    /// Validate a document and, if consistent, sign it.
    Sign(SignArgs),

    /// Verify a document signature with the public key.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Canonicalize(args) => run_canonicalize(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Sign(args) => run_sign(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
