//! Shared fixtures: the reference cast of participants and vaccine brands.
#![allow(dead_code)]

use coldchain_core::{Address, BatchId, CertificateId, ContentDigest, Role};
use coldchain_crypto::{payload_digest, Ed25519KeyPair};
use coldchain_ledger::{Authority, Coordinator, CoordinatorConfig, LedgerError, TransitionRequest};
use coldchain_state::BatchStatus;
use coldchain_vc::TransitionClaim;
use serde_json::json;

pub const PFIZER: &str = "Pfizer-BioNTech";
pub const MODERNA: &str = "Moderna";
pub const JANSSEN: &str = "Johnson & Johnson's Janssen";
pub const SPUTNIK: &str = "Sputnik V";

/// Everyone who takes part in the reference scenarios. Keys are seeded so
/// addresses are stable across runs.
pub struct Cast {
    pub registrar: Authority,
    pub manufacturer_a: Ed25519KeyPair,
    pub manufacturer_b: Ed25519KeyPair,
    pub inspector: Ed25519KeyPair,
    pub distributor_global: Ed25519KeyPair,
    pub distributor_local: Ed25519KeyPair,
    pub immunizer: Ed25519KeyPair,
    pub traveler: Ed25519KeyPair,
    pub border_agent: Ed25519KeyPair,
}

impl Cast {
    pub fn new() -> Self {
        let key = |n: u8| Ed25519KeyPair::from_seed(&[n; 32]);
        Self {
            registrar: Authority::new(key(100)),
            manufacturer_a: key(1),
            manufacturer_b: key(2),
            inspector: key(3),
            distributor_global: key(4),
            distributor_local: key(5),
            immunizer: key(6),
            traveler: key(7),
            border_agent: key(8),
        }
    }

    pub fn roles(&self) -> Vec<(&Ed25519KeyPair, Role)> {
        vec![
            (&self.manufacturer_a, Role::Prover),
            (&self.manufacturer_b, Role::Prover),
            (&self.inspector, Role::Issuer),
            (&self.distributor_global, Role::Verifier),
            (&self.distributor_local, Role::Verifier),
            (&self.immunizer, Role::Issuer),
            (&self.traveler, Role::Prover),
            (&self.border_agent, Role::Verifier),
        ]
    }

    /// A coordinator with every cast member registered.
    pub fn ledger(&self, config: CoordinatorConfig) -> Coordinator {
        let c = Coordinator::new(self.registrar.address(), config);
        for (key, role) in self.roles() {
            c.register_entity(&self.registrar, key.address(), role)
                .expect("register cast member");
        }
        c
    }

    /// The ten reference batches, in creation order.
    pub fn batches(&self) -> Vec<(&'static str, Address)> {
        let a = self.manufacturer_a.address();
        let b = self.manufacturer_b.address();
        vec![
            (PFIZER, a),
            (MODERNA, a),
            (JANSSEN, b),
            (SPUTNIK, b),
            (PFIZER, b),
            (PFIZER, a),
            (MODERNA, a),
            (MODERNA, b),
            (SPUTNIK, b),
            (JANSSEN, a),
        ]
    }
}

/// Digest of a synthetic temperature-log document for one hop.
pub fn evidence(batch_id: BatchId, to: BatchStatus) -> ContentDigest {
    payload_digest(&json!({
        "batch": batch_id.value(),
        "checkpoint": to.as_str(),
        "minTenthsC": -750,
        "maxTenthsC": -680,
    }))
    .expect("evidence digest")
}

/// The claim for the hop out of `from`.
pub fn claim_for(batch_id: BatchId, subject: Address, from: BatchStatus) -> TransitionClaim {
    let to = from.next().expect("non-terminal status");
    TransitionClaim {
        subject,
        batch_id,
        from_status: from,
        to_status: to,
        payload_hash: evidence(batch_id, to),
    }
}

/// Sign and submit the next hop for `batch_id`.
pub fn advance(
    ledger: &Coordinator,
    batch_id: BatchId,
    issuer: &Ed25519KeyPair,
    witness: Option<&Ed25519KeyPair>,
) -> Result<CertificateId, LedgerError> {
    let batch = ledger.get_batch(batch_id)?;
    let claim = claim_for(batch_id, batch.manufacturer, batch.status);
    let mut request = TransitionRequest::signed(&claim, issuer)?;
    if let Some(w) = witness {
        request = request.witnessed_by(&claim, w)?;
    }
    ledger.request_transition(request)
}
