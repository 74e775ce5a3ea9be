//! # Lifecycle Coordinator
//!
//! The single entry point for ledger mutations. A transition request is
//! processed in three phases:
//!
//! 1. **Check** under the read lock: batch exists and is not DELIVERED,
//!    issuer is an ISSUER, subject is a PROVER, any witness is a VERIFIER,
//!    the hop is not already certified, `to` follows the current status,
//!    and the edge's witness policy is met.
//! 2. **Verify** with no lock held: recompute the canonical claim and check
//!    the issuer and witness signatures.
//! 3. **Commit** under the write lock: rerun the phase 1 checks (another
//!    request may have committed in between), then append the certificate,
//!    advance the batch, attach the certificate id, and journal one event.
//!
//! Phase 3 either applies all four effects or none. Requests on different
//! batches verify in parallel and serialize only on the commit.

use parking_lot::RwLock;

use coldchain_core::{Address, BatchId, CertificateId, ContentDigest, Role, Timestamp};
use coldchain_crypto::{Ed25519KeyPair, Ed25519Signature};
use coldchain_state::{BatchStatus, VaccineBatch};
use coldchain_vc::{Certificate, TransitionClaim, Witness};

use crate::authority::{check_endorsement, Authority, RegistrarRequest};
use crate::batch_store::BatchStore;
use crate::certificate_ledger::{signature_error, CertificateLedger};
use crate::chain;
use crate::config::CoordinatorConfig;
use crate::error::LedgerError;
use crate::events::{EventJournal, EventRecord, LedgerEvent};
use crate::registry::{Entity, EntityRegistry};

/// A request to certify one lifecycle hop.
///
/// `from_status` is not part of the request: the coordinator takes it from
/// the batch's current status when rebuilding the claim, so a signature
/// made for a different starting status fails verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    /// The batch to advance.
    pub batch_id: BatchId,
    /// The attesting ISSUER.
    pub issuer: Address,
    /// The PROVER the certificate is about.
    pub subject: Address,
    /// Requested next status.
    pub to_status: BatchStatus,
    /// Digest of the evidence document.
    pub payload_hash: ContentDigest,
    /// Issuer signature over the claim.
    pub signature: Ed25519Signature,
    /// Optional VERIFIER co-signature over the same claim.
    pub witness: Option<Witness>,
}

impl TransitionRequest {
    /// Build a request by signing `claim` with the issuer's key.
    pub fn signed(claim: &TransitionClaim, issuer: &Ed25519KeyPair) -> Result<Self, LedgerError> {
        let signature = claim
            .sign(issuer)
            .map_err(|e| signature_error(claim.batch_id, e))?;
        Ok(Self {
            batch_id: claim.batch_id,
            issuer: issuer.address(),
            subject: claim.subject,
            to_status: claim.to_status,
            payload_hash: claim.payload_hash,
            signature,
            witness: None,
        })
    }

    /// Attach a VERIFIER co-signature over `claim`.
    pub fn witnessed_by(
        mut self,
        claim: &TransitionClaim,
        verifier: &Ed25519KeyPair,
    ) -> Result<Self, LedgerError> {
        let signature = claim
            .sign(verifier)
            .map_err(|e| signature_error(claim.batch_id, e))?;
        self.witness = Some(Witness {
            verifier: verifier.address(),
            signature,
        });
        Ok(self)
    }

    fn claim(&self, from_status: BatchStatus) -> TransitionClaim {
        TransitionClaim {
            subject: self.subject,
            batch_id: self.batch_id,
            from_status,
            to_status: self.to_status,
            payload_hash: self.payload_hash,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    registry: EntityRegistry,
    batches: BatchStore,
    certificates: CertificateLedger,
    journal: EventJournal,
}

impl LedgerState {
    /// Everything about a transition request that does not need a
    /// signature check. Returns the hop's `from` status.
    fn check_transition(
        &self,
        request: &TransitionRequest,
        config: &CoordinatorConfig,
    ) -> Result<BatchStatus, LedgerError> {
        let batch = self.batches.get(request.batch_id)?;
        if batch.status.is_terminal() {
            return Err(LedgerError::TerminalState {
                batch_id: batch.id,
            });
        }

        self.registry.require_role(&request.issuer, Role::Issuer)?;
        self.registry.require_role(&request.subject, Role::Prover)?;
        if let Some(w) = &request.witness {
            self.registry.require_role(&w.verifier, Role::Verifier)?;
        }

        let to = request.to_status;
        if let Some(prev) = to.previous() {
            if let Some(existing) = self.certificates.existing(batch.id, prev, to) {
                return Err(LedgerError::DuplicateTransition {
                    batch_id: batch.id,
                    from: prev,
                    to,
                    existing,
                });
            }
        }

        let from = batch.check_advance(to)?;
        if request.witness.is_none() && config.requires_witness(from, to) {
            return Err(LedgerError::WitnessRequired {
                batch_id: batch.id,
                from,
                to,
            });
        }
        Ok(from)
    }

    fn snapshot(&self, batch_id: BatchId) -> Result<(VaccineBatch, Vec<Certificate>), LedgerError> {
        let batch = self.batches.get(batch_id)?.clone();
        let trail = self.certificates.list_for_batch(batch_id);
        Ok((batch, trail))
    }
}

/// The cold-chain certification ledger.
///
/// `Send + Sync`; share it across threads with `Arc<Coordinator>`.
#[derive(Debug)]
pub struct Coordinator {
    registrar: Address,
    config: CoordinatorConfig,
    state: RwLock<LedgerState>,
}

impl Coordinator {
    /// An empty ledger administered by `registrar`.
    pub fn new(registrar: Address, config: CoordinatorConfig) -> Self {
        tracing::debug!(registrar = %registrar.short(), ?config, "coordinator created");
        Self {
            registrar,
            config,
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// The registrar address.
    pub fn registrar(&self) -> Address {
        self.registrar
    }

    /// Active configuration.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // -- Registrar operations -------------------------------------------------

    /// Admit a participant with a permanent role.
    pub fn register_entity(
        &self,
        authority: &Authority,
        id: Address,
        mode: Role,
    ) -> Result<Entity, LedgerError> {
        log_rejection("register_entity", self.try_register_entity(authority, id, mode))
    }

    fn try_register_entity(
        &self,
        authority: &Authority,
        id: Address,
        mode: Role,
    ) -> Result<Entity, LedgerError> {
        let request = RegistrarRequest::RegisterEntity { entity: id, mode };
        let endorsement = authority.endorse(&request)?;
        check_endorsement(&self.registrar, &request, &endorsement)?;

        let mut state = self.state.write();
        let entity = state.registry.register(id, mode)?.clone();
        state.journal.append(
            endorsement.signer,
            LedgerEvent::EntityRegistered { entity_id: id, mode },
        );
        tracing::info!(entity = %id.short(), %mode, "entity registered");
        Ok(entity)
    }

    /// Create a batch in MANUFACTURED.
    pub fn create_batch(
        &self,
        authority: &Authority,
        brand: &str,
        manufacturer: Address,
    ) -> Result<BatchId, LedgerError> {
        log_rejection(
            "create_batch",
            self.try_create_batch(authority, brand, manufacturer),
        )
    }

    fn try_create_batch(
        &self,
        authority: &Authority,
        brand: &str,
        manufacturer: Address,
    ) -> Result<BatchId, LedgerError> {
        let request = RegistrarRequest::CreateBatch {
            brand: brand.to_string(),
            manufacturer,
        };
        let endorsement = authority.endorse(&request)?;
        check_endorsement(&self.registrar, &request, &endorsement)?;

        let mut guard = self.state.write();
        let state = &mut *guard;
        let batch = state.batches.create(&state.registry, brand, manufacturer)?;
        let event = LedgerEvent::BatchCreated {
            batch_id: batch.id,
            brand: batch.brand.clone(),
            manufacturer,
            status: batch.status,
        };
        let batch_id = batch.id;
        state.journal.append(endorsement.signer, event);
        tracing::info!(%batch_id, brand = brand.trim(), manufacturer = %manufacturer.short(), "batch created");
        Ok(batch_id)
    }

    // -- Transitions ----------------------------------------------------------

    /// Certify one hop and advance the batch.
    pub fn request_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<CertificateId, LedgerError> {
        let batch_id = request.batch_id;
        let to = request.to_status;
        let result = self.try_transition(request);
        if let Err(e) = &result {
            tracing::warn!(%batch_id, to = %to, kind = %e.kind(), error = %e, "transition rejected");
        }
        result
    }

    fn try_transition(&self, request: TransitionRequest) -> Result<CertificateId, LedgerError> {
        let from = self.state.read().check_transition(&request, &self.config)?;

        let claim = request.claim(from);
        let canonical = claim.canonical_bytes().map_err(|e| signature_error(request.batch_id, e))?;
        coldchain_crypto::verify(&canonical, &request.signature, &request.issuer).map_err(|_| {
            LedgerError::InvalidSignature {
                signer: request.issuer,
                batch_id: request.batch_id,
            }
        })?;
        if let Some(w) = &request.witness {
            coldchain_crypto::verify(&canonical, &w.signature, &w.verifier).map_err(|_| {
                LedgerError::InvalidSignature {
                    signer: w.verifier,
                    batch_id: request.batch_id,
                }
            })?;
        }
        tracing::debug!(batch_id = %request.batch_id, %from, to = %request.to_status, "transition signatures verified");

        let mut state = self.state.write();
        let from = state.check_transition(&request, &self.config)?;
        let certificate = Certificate {
            id: state.certificates.next_id(),
            issuer: request.issuer,
            issuer_mode: Role::Issuer,
            subject: request.subject,
            batch_id: request.batch_id,
            from_status: from,
            to_status: request.to_status,
            payload_hash: request.payload_hash,
            signature: request.signature,
            witness: request.witness.clone(),
            issued_at: Timestamp::now(),
        };
        // The checks above ran under this lock, so none of these can fail.
        let certificate_id = state.certificates.append_verified(certificate)?;
        state.batches.advance(request.batch_id, request.to_status)?;
        state
            .batches
            .attach_certificate(request.batch_id, certificate_id)?;
        state.journal.append(
            request.issuer,
            LedgerEvent::TransitionCertified {
                certificate_id,
                batch_id: request.batch_id,
                issuer: request.issuer,
                subject: request.subject,
                from_status: from,
                to_status: request.to_status,
                witness: request.witness.as_ref().map(|w| w.verifier),
            },
        );
        tracing::info!(
            batch_id = %request.batch_id,
            %certificate_id,
            %from,
            to = %request.to_status,
            issuer = %request.issuer.short(),
            "transition certified"
        );
        Ok(certificate_id)
    }

    // -- Verification ---------------------------------------------------------

    /// Check that the batch's certificate trail is complete, contiguous and
    /// validly signed.
    pub fn verify_chain(&self, batch_id: BatchId) -> Result<(), LedgerError> {
        let (batch, trail) = self.state.read().snapshot(batch_id)?;
        let result = chain::verify_links(&batch, &trail);
        match &result {
            Ok(()) => tracing::debug!(%batch_id, links = trail.len(), "chain verified"),
            Err(e) => tracing::warn!(%batch_id, error = %e, "chain verification failed"),
        }
        result
    }

    /// Checkpoint view: verify the chain and return the latest certificate,
    /// rejecting it if older than the configured TTL at instant `at`.
    pub fn verify_presentation(
        &self,
        batch_id: BatchId,
        at: Timestamp,
    ) -> Result<Certificate, LedgerError> {
        let (batch, trail) = self.state.read().snapshot(batch_id)?;
        chain::verify_links(&batch, &trail)?;
        let latest = trail
            .last()
            .cloned()
            .ok_or(LedgerError::NoCertificates { batch_id })?;
        if let Some(ttl) = self.config.certificate_ttl_secs {
            if let Some(expired_at) = latest.expires_at(ttl) {
                if at > expired_at {
                    return Err(LedgerError::StaleCertificate {
                        certificate_id: latest.id,
                        issued_at: latest.issued_at,
                        expired_at,
                    });
                }
            }
        }
        tracing::debug!(%batch_id, certificate_id = %latest.id, at = %at, "presentation accepted");
        Ok(latest)
    }

    // -- Reads ----------------------------------------------------------------

    /// A registered participant.
    pub fn get_entity(&self, id: &Address) -> Result<Entity, LedgerError> {
        self.state.read().registry.get(id).cloned()
    }

    /// Role of `id`, if registered.
    pub fn lookup_role(&self, id: &Address) -> Option<Role> {
        self.state.read().registry.lookup(id)
    }

    /// A batch snapshot.
    pub fn get_batch(&self, batch_id: BatchId) -> Result<VaccineBatch, LedgerError> {
        self.state.read().batches.get(batch_id).cloned()
    }

    /// All batches in id order.
    pub fn batches(&self) -> Vec<VaccineBatch> {
        self.state.read().batches.iter().cloned().collect()
    }

    /// A certificate.
    pub fn get_certificate(&self, certificate_id: CertificateId) -> Result<Certificate, LedgerError> {
        self.state.read().certificates.get(certificate_id).cloned()
    }

    /// The audit trail of a batch, in issuance order.
    pub fn list_certificates(&self, batch_id: BatchId) -> Result<Vec<Certificate>, LedgerError> {
        Ok(self.state.read().snapshot(batch_id)?.1)
    }

    /// Journal records with `sequence >= from`.
    pub fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.state.read().journal.since(from)
    }
}

fn log_rejection<T>(op: &'static str, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
    if let Err(e) = &result {
        tracing::warn!(op, kind = %e.kind(), error = %e, "request rejected");
    }
    result
}
