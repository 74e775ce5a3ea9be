//! # coldchain-cli: Operator CLI for the Cold-Chain Ledger
//!
//! ## Subcommands
//!
//! - `coldchain keygen`: Ed25519 participant key pair (`.key` seed, `.pub` address).
//! - `coldchain sign-claim`: Sign a transition claim the way an issuer or
//!   checkpoint witness would, printing the canonical bytes and signature.
//! - `coldchain simulate`: Run a YAML scenario (participants, batches,
//!   transitions) through an in-memory ledger and print the audit trail.
//!
//! ```bash
//! coldchain keygen --output keys --prefix inspector
//! coldchain sign-claim --key keys/inspector.key --batch 0 --subject <hex> \
//!     --from MANUFACTURED --to DELIVERING_INTERNATIONAL --evidence log.json
//! coldchain --config policy.yaml simulate demos/reference_cast.yaml
//! ```

pub mod claim;
pub mod keys;
pub mod simulate;

use std::path::Path;

use anyhow::{Context, Result};

use coldchain_crypto::Ed25519KeyPair;

/// Read a hex seed file written by `keygen`.
pub fn read_key(path: &Path) -> Result<Ed25519KeyPair> {
    let hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file: {}", path.display()))?;
    Ed25519KeyPair::from_seed_hex(hex.trim())
        .with_context(|| format!("invalid key file: {}", path.display()))
}

/// Read a JSON or YAML document, chosen by extension.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("invalid JSON: {}", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("invalid YAML: {}", path.display()))
    }
}
