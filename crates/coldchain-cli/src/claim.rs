//! # Sign-Claim Subcommand
//!
//! Builds a transition claim, signs it, and prints a JSON object with the
//! claim, its canonical bytes, the signer address and the signature. An
//! issuer and a checkpoint witness both use this: the ledger checks both
//! signatures against the same canonical bytes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use coldchain_core::{Address, BatchId, ContentDigest};
use coldchain_crypto::{payload_digest, Ed25519Signature};
use coldchain_state::BatchStatus;
use coldchain_vc::TransitionClaim;

/// Arguments for `coldchain sign-claim`.
#[derive(Args, Debug)]
pub struct SignClaimArgs {
    /// Signer key file (hex seed written by `keygen`).
    #[arg(long)]
    pub key: PathBuf,
    /// Batch id.
    #[arg(long)]
    pub batch: u64,
    /// Subject (PROVER) address, 64 hex chars.
    #[arg(long)]
    pub subject: Address,
    /// Status before the hop.
    #[arg(long)]
    pub from: BatchStatus,
    /// Status after the hop.
    #[arg(long)]
    pub to: BatchStatus,
    /// Evidence document (JSON or YAML) to digest into `payloadHash`.
    #[arg(long, conflicts_with = "payload_hash", required_unless_present = "payload_hash")]
    pub evidence: Option<PathBuf>,
    /// Precomputed `sha256:<hex>` payload hash.
    #[arg(long)]
    pub payload_hash: Option<ContentDigest>,
}

/// What `sign-claim` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedClaim {
    /// The claim fields.
    pub claim: TransitionClaim,
    /// Exact bytes that were signed.
    pub canonical: String,
    /// Signer address.
    pub signer: Address,
    /// Signature hex.
    pub signature: Ed25519Signature,
}

/// Execute `coldchain sign-claim`.
pub fn run_sign_claim(args: &SignClaimArgs) -> Result<u8> {
    let signed = sign_claim(args)?;
    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(0)
}

/// Build and sign the claim described by `args`.
pub fn sign_claim(args: &SignClaimArgs) -> Result<SignedClaim> {
    let key = crate::read_key(&args.key)?;
    let payload_hash = match (&args.payload_hash, &args.evidence) {
        (Some(hash), _) => *hash,
        (None, Some(path)) => {
            let doc = crate::read_document(path)?;
            payload_digest(&doc)
                .with_context(|| format!("cannot digest evidence {}", path.display()))?
        }
        (None, None) => anyhow::bail!("one of --evidence or --payload-hash is required"),
    };
    if !args.from.precedes(args.to) {
        tracing::warn!(from = %args.from, to = %args.to, "claim is not a lifecycle edge; the ledger will reject it");
    }

    let claim = TransitionClaim {
        subject: args.subject,
        batch_id: BatchId(args.batch),
        from_status: args.from,
        to_status: args.to,
        payload_hash,
    };
    let canonical = claim.canonical_bytes()?;
    let signature = key.sign(&canonical);
    Ok(SignedClaim {
        canonical: canonical.as_str().to_string(),
        claim,
        signer: key.address(),
        signature,
    })
}
