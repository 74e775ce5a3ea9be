//! # Transition Claims
//!
//! The signed message for one lifecycle hop. An issuer signs the JCS form of
//!
//! ```json
//! {"batchId":0,"fromStatus":"MANUFACTURED","payloadHash":"sha256:…","subject":"<hex>","toStatus":"DELIVERING_INTERNATIONAL"}
//! ```
//!
//! Keys sort lexicographically under JCS, statuses use their upper-case
//! names, and the subject is the PROVER's address in lowercase hex. Any
//! party holding the five values can rebuild the exact bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coldchain_core::{Address, BatchId, CanonicalBytes, CanonicalizationError, ContentDigest};
use coldchain_crypto::{CryptoError, Ed25519KeyPair, Ed25519Signature};
use coldchain_state::BatchStatus;

/// Errors from claim signing and certificate verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// The claim could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The issuer's signature does not verify against the claim.
    #[error("issuer signature by {issuer} invalid: {source}")]
    IssuerSignature {
        /// Claimed issuer.
        issuer: Address,
        /// Underlying verification failure.
        #[source]
        source: CryptoError,
    },

    /// The witness co-signature does not verify against the claim.
    #[error("witness signature by {verifier} invalid: {source}")]
    WitnessSignature {
        /// Claimed witness.
        verifier: Address,
        /// Underlying verification failure.
        #[source]
        source: CryptoError,
    },
}

/// The five fields an issuer attests to for one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransitionClaim {
    /// The PROVER the certificate is about.
    pub subject: Address,
    /// The batch that moved.
    pub batch_id: BatchId,
    /// Status before the hop.
    pub from_status: BatchStatus,
    /// Status after the hop.
    pub to_status: BatchStatus,
    /// Digest of the off-ledger evidence document.
    pub payload_hash: ContentDigest,
}

impl TransitionClaim {
    /// The canonical signing input.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, VcError> {
        Ok(CanonicalBytes::new(self)?)
    }

    /// Sign this claim. Used by issuers and witnesses alike.
    pub fn sign(&self, key: &Ed25519KeyPair) -> Result<Ed25519Signature, VcError> {
        Ok(key.sign(&self.canonical_bytes()?))
    }

    /// Check that `signature` is `signer`'s signature over this claim.
    pub fn verify(&self, signature: &Ed25519Signature, signer: &Address) -> Result<(), CryptoError> {
        let canonical = CanonicalBytes::new(self)?;
        coldchain_crypto::verify(&canonical, signature, signer)
    }
}
