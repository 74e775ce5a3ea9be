//! # Batch Store
//!
//! Batch ids are dense and sequential, so the store is a `Vec` indexed by
//! id. Status changes go through [`BatchStore::advance`], which is
//! crate-private: only the coordinator moves a batch, and only after its
//! certificate is on the ledger.

use coldchain_core::{Address, BatchId, CertificateId, Role};
use coldchain_state::{BatchStatus, VaccineBatch};

use crate::error::LedgerError;
use crate::registry::EntityRegistry;

/// All batches, indexed by id.
#[derive(Debug, Default, Clone)]
pub struct BatchStore {
    batches: Vec<VaccineBatch>,
}

impl BatchStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch in MANUFACTURED. `manufacturer` must be a registered PROVER.
    pub fn create(
        &mut self,
        registry: &EntityRegistry,
        brand: &str,
        manufacturer: Address,
    ) -> Result<&VaccineBatch, LedgerError> {
        if registry.lookup(&manufacturer) != Some(Role::Prover) {
            return Err(LedgerError::UnknownManufacturer { manufacturer });
        }
        let id = BatchId(self.batches.len() as u64);
        let batch = VaccineBatch::new(id, brand, manufacturer)?;
        self.batches.push(batch);
        Ok(&self.batches[self.batches.len() - 1])
    }

    /// Look up a batch.
    pub fn get(&self, batch_id: BatchId) -> Result<&VaccineBatch, LedgerError> {
        usize::try_from(batch_id.value())
            .ok()
            .and_then(|i| self.batches.get(i))
            .ok_or(LedgerError::BatchNotFound { batch_id })
    }

    fn get_mut(&mut self, batch_id: BatchId) -> Result<&mut VaccineBatch, LedgerError> {
        usize::try_from(batch_id.value())
            .ok()
            .and_then(|i| self.batches.get_mut(i))
            .ok_or(LedgerError::BatchNotFound { batch_id })
    }

    /// Move a batch to its immediate successor status.
    pub(crate) fn advance(
        &mut self,
        batch_id: BatchId,
        to: BatchStatus,
    ) -> Result<BatchStatus, LedgerError> {
        Ok(self.get_mut(batch_id)?.advance(to)?)
    }

    /// Append a certificate id to a batch's trail.
    pub(crate) fn attach_certificate(
        &mut self,
        batch_id: BatchId,
        certificate_id: CertificateId,
    ) -> Result<(), LedgerError> {
        self.get_mut(batch_id)?.attach_certificate(certificate_id);
        Ok(())
    }

    /// Number of batches.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether no batch exists.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// All batches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &VaccineBatch> {
        self.batches.iter()
    }
}
