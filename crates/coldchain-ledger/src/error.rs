//! # Ledger Errors
//!
//! One error enum for every ledger operation. Each variant carries the
//! identifiers involved so a caller can act on the failure without parsing
//! the message. [`LedgerError::kind`] groups variants for callers that only
//! care about the broad class (e.g. map NotFound to a 404).

use serde::Serialize;
use thiserror::Error;

use coldchain_core::{Address, BatchId, CanonicalizationError, CertificateId, Role, Timestamp};
use coldchain_state::{BatchError, BatchStatus};

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller or a named participant lacks the required role or authority.
    Authorization,
    /// A referenced entity, batch or certificate does not exist.
    NotFound,
    /// The request conflicts with the batch lifecycle.
    State,
    /// A signature, chain link or freshness check failed.
    Integrity,
    /// The record already exists.
    Conflict,
    /// Canonical encoding failed.
    Internal,
}

impl ErrorKind {
    /// Lowercase name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::State => "state",
            Self::Integrity => "integrity",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    // -- Authorization --
    /// The participant is unregistered or holds a different role.
    #[error("entity {entity} must be {expected}, found {}", role_or_unregistered(.actual))]
    UnauthorizedRole {
        /// The participant checked.
        entity: Address,
        /// Role the operation requires.
        expected: Role,
        /// Registered role, `None` when unregistered.
        actual: Option<Role>,
    },

    /// Batch manufacturer is not a registered PROVER.
    #[error("manufacturer {manufacturer} is not a registered PROVER")]
    UnknownManufacturer {
        /// The rejected manufacturer.
        manufacturer: Address,
    },

    /// The endorsement on a registrar operation is not from the configured registrar.
    #[error("{caller} is not the ledger registrar")]
    UnauthorizedRegistrar {
        /// Address that endorsed the request.
        caller: Address,
    },

    /// The edge policy requires a VERIFIER co-signature and none was supplied.
    #[error("{batch_id}: {from} -> {to} requires a checkpoint witness")]
    WitnessRequired {
        /// The batch.
        batch_id: BatchId,
        /// Status before the hop.
        from: BatchStatus,
        /// Status after the hop.
        to: BatchStatus,
    },

    // -- Not found --
    /// No entity with this address.
    #[error("entity {entity} not found")]
    EntityNotFound {
        /// The unknown address.
        entity: Address,
    },

    /// No batch with this id.
    #[error("{batch_id} not found")]
    BatchNotFound {
        /// The unknown id.
        batch_id: BatchId,
    },

    /// No certificate with this id.
    #[error("{certificate_id} not found")]
    CertificateNotFound {
        /// The unknown id.
        certificate_id: CertificateId,
    },

    // -- State --
    /// `to` is not the immediate successor of the batch's current status.
    #[error("{batch_id}: invalid transition {from} -> {to}")]
    InvalidTransition {
        /// The batch.
        batch_id: BatchId,
        /// Current status.
        from: BatchStatus,
        /// Requested status.
        to: BatchStatus,
    },

    /// The batch is DELIVERED.
    #[error("{batch_id} is DELIVERED and cannot transition")]
    TerminalState {
        /// The batch.
        batch_id: BatchId,
    },

    /// Brand is empty after trimming.
    #[error("batch brand must not be empty")]
    InvalidBrand,

    /// A presentation was requested for a batch with no certificates.
    #[error("{batch_id} has no certificates to present")]
    NoCertificates {
        /// The batch.
        batch_id: BatchId,
    },

    // -- Integrity --
    /// An issuer or witness signature did not verify over the transition claim.
    #[error("invalid signature by {signer} on {batch_id} transition")]
    InvalidSignature {
        /// The issuer or witness whose signature failed.
        signer: Address,
        /// The batch.
        batch_id: BatchId,
    },

    /// The certificate trail of a batch is not a valid chain.
    #[error("chain broken for {batch_id}{}: {reason}", at_certificate(.certificate_id))]
    ChainBroken {
        /// The batch.
        batch_id: BatchId,
        /// First offending certificate; `None` when the trail is empty.
        certificate_id: Option<CertificateId>,
        /// What failed.
        reason: String,
    },

    /// A certificate already exists for this hop.
    #[error("{batch_id}: {from} -> {to} already certified by {existing}")]
    DuplicateTransition {
        /// The batch.
        batch_id: BatchId,
        /// Status before the hop.
        from: BatchStatus,
        /// Status after the hop.
        to: BatchStatus,
        /// The certificate already covering the hop.
        existing: CertificateId,
    },

    /// The latest certificate is older than the configured TTL.
    #[error("{certificate_id} issued {issued_at} expired at {expired_at}")]
    StaleCertificate {
        /// The stale certificate.
        certificate_id: CertificateId,
        /// When it was issued.
        issued_at: Timestamp,
        /// When it stopped being fresh.
        expired_at: Timestamp,
    },

    // -- Conflict --
    /// The address is already registered.
    #[error("entity {entity} already registered")]
    AlreadyRegistered {
        /// The address.
        entity: Address,
    },

    // -- Internal --
    /// Canonical encoding of a claim or registrar request failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl LedgerError {
    /// The broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnauthorizedRole { .. }
            | Self::UnknownManufacturer { .. }
            | Self::UnauthorizedRegistrar { .. }
            | Self::WitnessRequired { .. } => ErrorKind::Authorization,
            Self::EntityNotFound { .. }
            | Self::BatchNotFound { .. }
            | Self::CertificateNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. }
            | Self::TerminalState { .. }
            | Self::InvalidBrand
            | Self::NoCertificates { .. } => ErrorKind::State,
            Self::InvalidSignature { .. }
            | Self::ChainBroken { .. }
            | Self::DuplicateTransition { .. }
            | Self::StaleCertificate { .. } => ErrorKind::Integrity,
            Self::AlreadyRegistered { .. } => ErrorKind::Conflict,
            Self::Canonicalization(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn chain_broken(
        batch_id: BatchId,
        certificate_id: Option<CertificateId>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ChainBroken {
            batch_id,
            certificate_id,
            reason: reason.into(),
        }
    }
}

impl From<BatchError> for LedgerError {
    fn from(e: BatchError) -> Self {
        match e {
            BatchError::InvalidTransition { batch_id, from, to } => {
                Self::InvalidTransition { batch_id, from, to }
            }
            BatchError::TerminalState { batch_id } => Self::TerminalState { batch_id },
            BatchError::InvalidBrand => Self::InvalidBrand,
        }
    }
}

fn role_or_unregistered(role: &Option<Role>) -> &'static str {
    role.map_or("unregistered", |r| r.as_str())
}

fn at_certificate(id: &Option<CertificateId>) -> String {
    id.map(|c| format!(" at {c}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_role_message() {
        let e = LedgerError::UnauthorizedRole {
            entity: Address::from_bytes([0xaa; 32]),
            expected: Role::Issuer,
            actual: Some(Role::Prover),
        };
        assert!(e.to_string().ends_with("must be ISSUER, found PROVER"));
        assert_eq!(e.kind(), ErrorKind::Authorization);

        let e = LedgerError::UnauthorizedRole {
            entity: Address::from_bytes([0xaa; 32]),
            expected: Role::Prover,
            actual: None,
        };
        assert!(e.to_string().ends_with("found unregistered"));
    }

    #[test]
    fn test_chain_broken_message_with_and_without_certificate() {
        let e = LedgerError::chain_broken(BatchId(2), Some(CertificateId(5)), "gap");
        assert_eq!(e.to_string(), "chain broken for batch:2 at certificate:5: gap");
        let e = LedgerError::chain_broken(BatchId(2), None, "status ahead of trail");
        assert_eq!(e.to_string(), "chain broken for batch:2: status ahead of trail");
        assert_eq!(e.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn test_batch_error_conversion() {
        let e: LedgerError = BatchError::TerminalState { batch_id: BatchId(9) }.into();
        assert!(matches!(e, LedgerError::TerminalState { batch_id: BatchId(9) }));
        assert_eq!(e.kind(), ErrorKind::State);
        let e: LedgerError = BatchError::InvalidBrand.into();
        assert!(matches!(e, LedgerError::InvalidBrand));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            LedgerError::AlreadyRegistered { entity: Address::from_bytes([1; 32]) }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            LedgerError::BatchNotFound { batch_id: BatchId(0) }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
