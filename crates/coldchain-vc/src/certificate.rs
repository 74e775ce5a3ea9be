//! # Certificates
//!
//! The immutable ledger record of a certified hop. A certificate carries
//! its claim fields flat (so it reads naturally as JSON) and rebuilds the
//! [`TransitionClaim`] on demand for verification.
//!
//! `issuer_mode` is a snapshot of the issuer's role taken at issuance. Roles
//! never change after registration, so the snapshot always agrees with the
//! registry; chain verification reads the snapshot and does not need a
//! registry lookup per link.

use serde::{Deserialize, Serialize};

use coldchain_core::{Address, BatchId, CertificateId, ContentDigest, Role, Timestamp};
use coldchain_crypto::Ed25519Signature;
use coldchain_state::BatchStatus;

use crate::claim::{TransitionClaim, VcError};

/// A VERIFIER's co-signature over the same transition claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Witness {
    /// The checkpoint verifier.
    pub verifier: Address,
    /// Signature over the claim's canonical bytes.
    pub signature: Ed25519Signature,
}

/// A signed attestation of one lifecycle hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Certificate {
    /// Ledger-wide sequential id.
    pub id: CertificateId,
    /// The ISSUER that signed.
    pub issuer: Address,
    /// Issuer role at issuance.
    pub issuer_mode: Role,
    /// The PROVER the certificate is about.
    pub subject: Address,
    /// The batch that moved.
    pub batch_id: BatchId,
    /// Status before the hop.
    pub from_status: BatchStatus,
    /// Status after the hop.
    pub to_status: BatchStatus,
    /// Digest of the evidence document.
    pub payload_hash: ContentDigest,
    /// Issuer signature over [`Certificate::claim`].
    pub signature: Ed25519Signature,
    /// Checkpoint co-signature, when one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness: Option<Witness>,
    /// When the ledger accepted the certificate.
    pub issued_at: Timestamp,
}

impl Certificate {
    /// Rebuild the signed claim from the stored fields.
    pub fn claim(&self) -> TransitionClaim {
        TransitionClaim {
            subject: self.subject,
            batch_id: self.batch_id,
            from_status: self.from_status,
            to_status: self.to_status,
            payload_hash: self.payload_hash,
        }
    }

    /// Verify the issuer signature and, if present, the witness signature.
    pub fn verify_signatures(&self) -> Result<(), VcError> {
        let claim = self.claim();
        let canonical = claim.canonical_bytes()?;
        coldchain_crypto::verify(&canonical, &self.signature, &self.issuer).map_err(|source| {
            VcError::IssuerSignature {
                issuer: self.issuer,
                source,
            }
        })?;
        if let Some(w) = &self.witness {
            coldchain_crypto::verify(&canonical, &w.signature, &w.verifier).map_err(|source| {
                VcError::WitnessSignature {
                    verifier: w.verifier,
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Whether this certificate covers the `from -> to` hop.
    pub fn covers(&self, from: BatchStatus, to: BatchStatus) -> bool {
        self.from_status == from && self.to_status == to
    }

    /// The instant after which the certificate is stale, or `None` when
    /// `ttl_secs` overflows the calendar.
    pub fn expires_at(&self, ttl_secs: u64) -> Option<Timestamp> {
        self.issued_at.checked_add_secs(ttl_secs)
    }
}
