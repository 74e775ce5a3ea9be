//! # Certificate Ledger
//!
//! Append-only. Certificates get ledger-wide sequential ids and are never
//! modified or removed. At most one certificate exists per
//! `(batch, from, to)` hop.

use std::collections::HashMap;

use coldchain_core::{BatchId, CertificateId};
use coldchain_state::BatchStatus;
use coldchain_vc::{Certificate, VcError};

use crate::error::LedgerError;

type Hop = (BatchId, BatchStatus, BatchStatus);

/// The certificate log.
#[derive(Debug, Default, Clone)]
pub struct CertificateLedger {
    certificates: Vec<Certificate>,
    by_hop: HashMap<Hop, CertificateId>,
    by_batch: HashMap<BatchId, Vec<CertificateId>>,
}

impl CertificateLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify and append. The `id` field of `certificate` is overwritten with
    /// the next ledger id.
    pub fn append(&mut self, certificate: Certificate) -> Result<CertificateId, LedgerError> {
        certificate
            .verify_signatures()
            .map_err(|e| signature_error(certificate.batch_id, e))?;
        self.append_verified(certificate)
    }

    /// Append a certificate whose signatures the caller has already checked.
    pub(crate) fn append_verified(
        &mut self,
        mut certificate: Certificate,
    ) -> Result<CertificateId, LedgerError> {
        let hop = (
            certificate.batch_id,
            certificate.from_status,
            certificate.to_status,
        );
        if let Some(existing) = self.by_hop.get(&hop) {
            return Err(LedgerError::DuplicateTransition {
                batch_id: hop.0,
                from: hop.1,
                to: hop.2,
                existing: *existing,
            });
        }
        let id = self.next_id();
        certificate.id = id;
        self.by_hop.insert(hop, id);
        self.by_batch.entry(hop.0).or_default().push(id);
        self.certificates.push(certificate);
        Ok(id)
    }

    /// The certificate already covering `from -> to` on `batch_id`, if any.
    pub fn existing(
        &self,
        batch_id: BatchId,
        from: BatchStatus,
        to: BatchStatus,
    ) -> Option<CertificateId> {
        self.by_hop.get(&(batch_id, from, to)).copied()
    }

    /// The id the next append will receive.
    pub fn next_id(&self) -> CertificateId {
        CertificateId(self.certificates.len() as u64)
    }

    /// Look up a certificate.
    pub fn get(&self, certificate_id: CertificateId) -> Result<&Certificate, LedgerError> {
        usize::try_from(certificate_id.value())
            .ok()
            .and_then(|i| self.certificates.get(i))
            .ok_or(LedgerError::CertificateNotFound { certificate_id })
    }

    /// Every certificate for `batch_id`, in issuance order.
    pub fn list_for_batch(&self, batch_id: BatchId) -> Vec<Certificate> {
        self.by_batch
            .get(&batch_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.get(*id).ok().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of certificates.
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

/// Map a certificate verification failure to the ledger error naming the
/// party whose signature failed.
pub(crate) fn signature_error(batch_id: BatchId, e: VcError) -> LedgerError {
    match e {
        VcError::IssuerSignature { issuer, .. } => LedgerError::InvalidSignature {
            signer: issuer,
            batch_id,
        },
        VcError::WitnessSignature { verifier, .. } => LedgerError::InvalidSignature {
            signer: verifier,
            batch_id,
        },
        VcError::Canonicalization(e) => LedgerError::Canonicalization(e),
    }
}
