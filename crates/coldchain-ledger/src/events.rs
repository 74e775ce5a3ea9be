//! # Event Journal
//!
//! Every committed mutation produces exactly one [`EventRecord`], appended
//! under the same write lock as the mutation itself. Sequence numbers are
//! journal-wide, dense, and start at 0, so a consumer that remembers the
//! last sequence it saw can resume with [`EventJournal::since`].
//!
//! Records are also emitted as `tracing` events on the
//! `coldchain::events` target with the JSON form of the event attached.

use serde::{Deserialize, Serialize};

use coldchain_core::{Address, BatchId, CertificateId, Role};
use coldchain_state::BatchStatus;

/// A ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventName")]
pub enum LedgerEvent {
    /// A participant was admitted.
    #[serde(rename_all = "camelCase")]
    EntityRegistered {
        /// The participant.
        entity_id: Address,
        /// Its role.
        mode: Role,
    },
    /// A batch was created.
    #[serde(rename_all = "camelCase")]
    BatchCreated {
        /// The new batch.
        batch_id: BatchId,
        /// Brand.
        brand: String,
        /// Manufacturing PROVER.
        manufacturer: Address,
        /// Initial status (always MANUFACTURED).
        status: BatchStatus,
    },
    /// A hop was certified and the batch advanced.
    #[serde(rename_all = "camelCase")]
    TransitionCertified {
        /// The new certificate.
        certificate_id: CertificateId,
        /// The batch.
        batch_id: BatchId,
        /// Signing ISSUER.
        issuer: Address,
        /// PROVER the certificate is about.
        subject: Address,
        /// Status before.
        from_status: BatchStatus,
        /// Status after.
        to_status: BatchStatus,
        /// Checkpoint witness, if one co-signed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        witness: Option<Address>,
    },
}

impl LedgerEvent {
    /// The `eventName` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntityRegistered { .. } => "EntityRegistered",
            Self::BatchCreated { .. } => "BatchCreated",
            Self::TransitionCertified { .. } => "TransitionCertified",
        }
    }
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Journal-wide position, from 0.
    pub sequence: u64,
    /// Registrar (for registrations and batch creation) or issuer (for transitions).
    pub caller: Address,
    /// What happened.
    pub event: LedgerEvent,
}

/// In-memory append-only event journal.
#[derive(Debug, Default, Clone)]
pub struct EventJournal {
    records: Vec<EventRecord>,
}

impl EventJournal {
    /// An empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its record.
    pub fn append(&mut self, caller: Address, event: LedgerEvent) -> &EventRecord {
        let record = EventRecord {
            sequence: self.records.len() as u64,
            caller,
            event,
        };
        match serde_json::to_string(&record.event) {
            Ok(json) => tracing::info!(
                target: "coldchain::events",
                sequence = record.sequence,
                caller = %record.caller,
                event = %json,
                "{}",
                record.event.name()
            ),
            Err(e) => tracing::warn!(
                target: "coldchain::events",
                sequence = record.sequence,
                error = %e,
                "event not serializable"
            ),
        }
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Records with `sequence >= from`, in order.
    pub fn since(&self, from: u64) -> Vec<EventRecord> {
        let start = usize::try_from(from).unwrap_or(usize::MAX);
        self.records.get(start..).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has happened yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(b: u8) -> LedgerEvent {
        LedgerEvent::EntityRegistered {
            entity_id: Address::from_bytes([b; 32]),
            mode: Role::Prover,
        }
    }

    #[test]
    fn test_sequences_are_dense() {
        let mut j = EventJournal::new();
        let caller = Address::from_bytes([0; 32]);
        for b in 0..3 {
            j.append(caller, registered(b));
        }
        let seqs: Vec<u64> = j.since(0).iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_since() {
        let mut j = EventJournal::new();
        let caller = Address::from_bytes([0; 32]);
        j.append(caller, registered(1));
        j.append(caller, registered(2));
        assert_eq!(j.since(1).len(), 1);
        assert_eq!(j.since(1)[0].sequence, 1);
        assert!(j.since(2).is_empty());
        assert!(j.since(u64::MAX).is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let e = LedgerEvent::TransitionCertified {
            certificate_id: CertificateId(0),
            batch_id: BatchId(0),
            issuer: Address::from_bytes([1; 32]),
            subject: Address::from_bytes([2; 32]),
            from_status: BatchStatus::Manufactured,
            to_status: BatchStatus::DeliveringInternational,
            witness: None,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["eventName"], "TransitionCertified");
        assert_eq!(json["certificateId"], 0);
        assert_eq!(json["toStatus"], "DELIVERING_INTERNATIONAL");
        assert!(json.get("witness").is_none());
        assert_eq!(e.name(), "TransitionCertified");
    }
}
