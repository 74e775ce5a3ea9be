//! # Simulate Subcommand
//!
//! Drives an in-memory ledger through a scenario file and prints the
//! outcome as JSON: every participant's address, each batch with its
//! certificate trail and chain verdict, every rejected step with its error
//! kind, and the event journal.
//!
//! ```yaml
//! participants:
//!   - { name: manufacturerA, role: PROVER }
//!   - { name: inspector, role: ISSUER }
//!   - { name: distributorGlobal, role: VERIFIER }
//! batches:
//!   - { brand: Pfizer-BioNTech, manufacturer: manufacturerA }
//! transitions:
//!   - { batch: 0, issuer: inspector, evidence: { minTenthsC: -750 } }
//!   - { batch: 0, issuer: inspector, witness: distributorGlobal }
//! ```
//!
//! A transition's `to` defaults to the batch's next status and its subject
//! to the batch manufacturer. Rejected steps are recorded and the run
//! continues, so a scenario can demonstrate failure modes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use coldchain_core::{Address, BatchId, CertificateId, ContentDigest, Role};
use coldchain_crypto::{payload_digest, Ed25519KeyPair};
use coldchain_ledger::{
    Authority, Coordinator, CoordinatorConfig, ErrorKind, EventRecord, LedgerError,
    TransitionRequest,
};
use coldchain_state::{BatchStatus, VaccineBatch};
use coldchain_vc::{Certificate, TransitionClaim};

/// Arguments for `coldchain simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Scenario file (YAML or JSON).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,
    /// Exit with status 2 if any step was rejected.
    #[arg(long)]
    pub strict: bool,
}

/// A scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Registrar seed (hex). Random when absent.
    #[serde(default)]
    pub registrar_seed: Option<String>,
    /// Participants, registered in order.
    pub participants: Vec<ParticipantSpec>,
    /// Batches, created in order (ids from 0).
    #[serde(default)]
    pub batches: Vec<BatchSpec>,
    /// Transition requests, submitted in order.
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

/// A named participant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantSpec {
    /// Name used elsewhere in the scenario.
    pub name: String,
    /// Registered role.
    pub role: Role,
    /// Key seed (hex). Random when absent.
    #[serde(default)]
    pub seed: Option<String>,
}

/// A batch to create.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSpec {
    /// Vaccine brand.
    pub brand: String,
    /// Participant name of the manufacturer.
    pub manufacturer: String,
}

/// A transition to request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionSpec {
    /// Batch id.
    pub batch: u64,
    /// Participant name of the signing issuer.
    pub issuer: String,
    /// Participant name of the subject. Defaults to the batch manufacturer.
    #[serde(default)]
    pub subject: Option<String>,
    /// Participant name of a co-signing witness.
    #[serde(default)]
    pub witness: Option<String>,
    /// Target status. Defaults to the batch's next status.
    #[serde(default)]
    pub to: Option<BatchStatus>,
    /// Evidence document; its digest becomes `payloadHash`.
    #[serde(default)]
    pub evidence: serde_json::Value,
}

/// Output of a run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Registrar address.
    pub registrar: Address,
    /// Participants with their addresses.
    pub participants: Vec<ParticipantReport>,
    /// Final state of every batch.
    pub batches: Vec<BatchReport>,
    /// Steps the ledger refused.
    pub rejected: Vec<Rejection>,
    /// Full event journal.
    pub events: Vec<EventRecord>,
}

/// A participant in the report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantReport {
    /// Scenario name.
    pub name: String,
    /// Address.
    pub address: Address,
    /// Role.
    pub role: Role,
}

/// A batch in the report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Final batch record.
    pub batch: VaccineBatch,
    /// Whether `verify_chain` passed.
    pub chain_verified: bool,
    /// `verify_chain` error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_error: Option<String>,
    /// Audit trail.
    pub certificates: Vec<Certificate>,
}

/// A refused step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// `batches[i]` or `transitions[i]`.
    pub step: String,
    /// Error class.
    pub kind: ErrorKind,
    /// Error message.
    pub error: String,
}

impl Rejection {
    fn new(step: String, e: &LedgerError) -> Self {
        Self {
            step,
            kind: e.kind(),
            error: e.to_string(),
        }
    }
}

/// Execute `coldchain simulate`.
pub fn run_simulate(args: &SimulateArgs, config: CoordinatorConfig) -> Result<u8> {
    let doc = crate::read_document(&args.scenario)?;
    let scenario: Scenario = serde_json::from_value(doc)
        .with_context(|| format!("invalid scenario: {}", args.scenario.display()))?;
    let report = run_scenario(&scenario, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.strict && !report.rejected.is_empty() {
        tracing::warn!(rejected = report.rejected.len(), "scenario had rejected steps");
        return Ok(2);
    }
    Ok(0)
}

fn key_from(seed: Option<&str>) -> Result<Ed25519KeyPair> {
    match seed {
        Some(hex) => Ok(Ed25519KeyPair::from_seed_hex(hex)?),
        None => Ok(Ed25519KeyPair::generate()),
    }
}

/// Run `scenario` against a fresh ledger.
pub fn run_scenario(scenario: &Scenario, config: CoordinatorConfig) -> Result<SimulationReport> {
    let registrar = Authority::new(
        key_from(scenario.registrar_seed.as_deref()).context("invalid registrar_seed")?,
    );
    let ledger = Coordinator::new(registrar.address(), config);

    let mut keys: BTreeMap<&str, Ed25519KeyPair> = BTreeMap::new();
    let mut participants = Vec::with_capacity(scenario.participants.len());
    for p in &scenario.participants {
        if keys.contains_key(p.name.as_str()) {
            bail!("participant {} declared twice", p.name);
        }
        let key = key_from(p.seed.as_deref())
            .with_context(|| format!("invalid seed for participant {}", p.name))?;
        ledger
            .register_entity(&registrar, key.address(), p.role)
            .with_context(|| format!("failed to register {}", p.name))?;
        participants.push(ParticipantReport {
            name: p.name.clone(),
            address: key.address(),
            role: p.role,
        });
        keys.insert(p.name.as_str(), key);
    }
    let mut rejected = Vec::new();
    for (i, b) in scenario.batches.iter().enumerate() {
        let manufacturer = lookup(&keys, &b.manufacturer)?.address();
        if let Err(e) = ledger.create_batch(&registrar, &b.brand, manufacturer) {
            rejected.push(Rejection::new(format!("batches[{i}]"), &e));
        }
    }

    for (i, t) in scenario.transitions.iter().enumerate() {
        let step = format!("transitions[{i}]");
        let issuer = lookup(&keys, &t.issuer)?;
        let witness = match &t.witness {
            Some(name) => Some(lookup(&keys, name)?),
            None => None,
        };
        let subject = match &t.subject {
            Some(name) => Some(lookup(&keys, name)?.address()),
            None => None,
        };
        let payload_hash = payload_digest(&t.evidence)
            .with_context(|| format!("{step}: evidence cannot be canonicalized"))?;

        match submit(&ledger, t, payload_hash, issuer, subject, witness) {
            Ok(id) => tracing::info!(%step, certificate_id = %id, "step certified"),
            Err(e) => rejected.push(Rejection::new(step, &e)),
        }
    }

    let batches = ledger
        .batches()
        .into_iter()
        .map(|batch| {
            let verdict = ledger.verify_chain(batch.id);
            let certificates = ledger.list_certificates(batch.id)?;
            Ok(BatchReport {
                chain_verified: verdict.is_ok(),
                chain_error: verdict.err().map(|e| e.to_string()),
                certificates,
                batch,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(SimulationReport {
        registrar: registrar.address(),
        participants,
        batches,
        rejected,
        events: ledger.events_since(0),
    })
}

fn lookup<'a>(
    keys: &'a BTreeMap<&str, Ed25519KeyPair>,
    name: &str,
) -> Result<&'a Ed25519KeyPair> {
    keys.get(name)
        .with_context(|| format!("unknown participant {name}"))
}

fn submit(
    ledger: &Coordinator,
    spec: &TransitionSpec,
    payload_hash: ContentDigest,
    issuer: &Ed25519KeyPair,
    subject: Option<Address>,
    witness: Option<&Ed25519KeyPair>,
) -> Result<CertificateId, LedgerError> {
    let batch_id = BatchId(spec.batch);
    let batch = ledger.get_batch(batch_id)?;
    let to = match spec.to.or_else(|| batch.status.next()) {
        Some(to) => to,
        None => return Err(LedgerError::TerminalState { batch_id }),
    };
    let claim = TransitionClaim {
        subject: subject.unwrap_or(batch.manufacturer),
        batch_id,
        from_status: batch.status,
        to_status: to,
        payload_hash,
    };
    let mut request = TransitionRequest::signed(&claim, issuer)?;
    if let Some(w) = witness {
        request = request.witnessed_by(&claim, w)?;
    }
    ledger.request_transition(request)
}
