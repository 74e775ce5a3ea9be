//! # Custody Chain Verification
//!
//! A batch's certificate trail must read MANUFACTURED -> ... -> current
//! status with no gap, every link signed by an ISSUER, and every link about
//! this batch. [`verify_links`] walks a trail and reports the first link
//! that fails.
//!
//! The walk is a pure function over a batch snapshot and its trail, so a
//! checkpoint holding an exported trail can run it without a ledger.

use coldchain_state::{BatchStatus, VaccineBatch};
use coldchain_vc::{Certificate, VcError};

use crate::error::LedgerError;

/// Check that `certificates` is a valid, complete trail for `batch`.
pub fn verify_links(batch: &VaccineBatch, certificates: &[Certificate]) -> Result<(), LedgerError> {
    let mut expected_from = BatchStatus::Manufactured;

    for cert in certificates {
        let broken = |reason: String| LedgerError::chain_broken(batch.id, Some(cert.id), reason);

        if cert.batch_id != batch.id {
            return Err(broken(format!("certificate is for {}", cert.batch_id)));
        }
        if cert.from_status != expected_from {
            return Err(broken(format!(
                "link starts at {}, expected {expected_from}",
                cert.from_status
            )));
        }
        if !cert.from_status.precedes(cert.to_status) {
            return Err(broken(format!(
                "{} -> {} is not a lifecycle edge",
                cert.from_status, cert.to_status
            )));
        }
        if !cert.issuer_mode.can_attest() {
            return Err(broken(format!("issuer role was {}", cert.issuer_mode)));
        }
        cert.verify_signatures().map_err(|e| match e {
            VcError::Canonicalization(e) => LedgerError::Canonicalization(e),
            other => broken(other.to_string()),
        })?;

        tracing::debug!(batch_id = %batch.id, certificate_id = %cert.id, "chain link verified");
        expected_from = cert.to_status;
    }

    if expected_from != batch.status {
        return Err(LedgerError::chain_broken(
            batch.id,
            certificates.last().map(|c| c.id),
            format!(
                "trail ends at {expected_from} but batch is {}",
                batch.status
            ),
        ));
    }
    Ok(())
}
