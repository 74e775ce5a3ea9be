//! # Keygen Subcommand
//!
//! Writes `<prefix>.key` (32-byte seed, hex) and `<prefix>.pub` (the
//! participant address, hex). The address is what the registrar registers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use coldchain_crypto::Ed25519KeyPair;

/// Arguments for `coldchain keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "participant")]
    pub prefix: String,
}

/// Execute `coldchain keygen`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let (key_path, pub_path) = write_keypair(&args.output, &args.prefix, &Ed25519KeyPair::generate())?;
    let address = std::fs::read_to_string(&pub_path)
        .with_context(|| format!("failed to read back {}", pub_path.display()))?;

    println!("OK: generated Ed25519 participant key");
    println!("  Private key: {}", key_path.display());
    println!("  Address:     {}", pub_path.display());
    println!("  Address (hex): {address}");
    Ok(0)
}

/// Write a key pair to `<dir>/<prefix>.key` and `<dir>/<prefix>.pub`.
pub fn write_keypair(
    dir: &Path,
    prefix: &str,
    key: &Ed25519KeyPair,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let key_path = dir.join(format!("{prefix}.key"));
    let pub_path = dir.join(format!("{prefix}.pub"));
    std::fs::write(&key_path, key.seed_hex())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    std::fs::write(&pub_path, key.address().to_hex())
        .with_context(|| format!("failed to write address: {}", pub_path.display()))?;

    tracing::info!(address = %key.address().short(), path = %key_path.display(), "wrote participant key");
    Ok((key_path, pub_path))
}
