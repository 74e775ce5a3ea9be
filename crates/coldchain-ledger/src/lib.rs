//! # coldchain-ledger: Cold-Chain Certification Ledger
//!
//! Tracks vaccine batches from manufacture to the point of care and gates
//! every custody hop on a signed certificate.
//!
//! ```text
//! caller ──▶ Coordinator ──┬──▶ EntityRegistry      (address → role)
//!                          ├──▶ BatchStore          (batch records, lifecycle status)
//!                          ├──▶ Ed25519 verify      (claim signatures, outside the lock)
//!                          ├──▶ CertificateLedger   (append-only, one per hop)
//!                          └──▶ EventJournal        (one record per mutation)
//! ```
//!
//! ## Entry points
//!
//! - [`Coordinator::register_entity`] and [`Coordinator::create_batch`]
//!   require the registrar [`Authority`].
//! - [`Coordinator::request_transition`] takes a [`TransitionRequest`]
//!   signed by an ISSUER (and co-signed by a VERIFIER where the edge policy
//!   in [`CoordinatorConfig`] asks for one).
//! - [`Coordinator::verify_chain`] and [`Coordinator::verify_presentation`]
//!   audit a batch's trail.
//!
//! All state sits behind one `parking_lot::RwLock`. Reads return owned
//! snapshots; a mutation commits completely or not at all.

pub mod authority;
pub mod batch_store;
pub mod certificate_ledger;
pub mod chain;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod registry;

pub use authority::{Authority, Endorsement, RegistrarRequest};
pub use batch_store::BatchStore;
pub use certificate_ledger::CertificateLedger;
pub use config::{ConfigError, CoordinatorConfig};
pub use coordinator::{Coordinator, TransitionRequest};
pub use error::{ErrorKind, LedgerError};
pub use events::{EventJournal, EventRecord, LedgerEvent};
pub use registry::{Entity, EntityRegistry};
