//! # coldchain-core: Foundational Types for the Cold-Chain Ledger
//!
//! The leaf of the workspace dependency graph. Defines the primitives every
//! other crate builds on: the canonical byte encoding that signatures and
//! digests are computed over, participant addresses, the role taxonomy, and
//! UTC timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Address`, `BatchId` and
//!    `CertificateId` are distinct types. A batch id cannot be passed where a
//!    certificate id is expected.
//!
//! 2. **`CanonicalBytes` newtype.** Every signed or hashed byte string flows
//!    through `CanonicalBytes::new()` (RFC 8785 JCS). Two implementations that
//!    agree on the field names agree on the bytes.
//!
//! 3. **Single `Role` enum.** ISSUER, PROVER, VERIFIER. Capability checks are
//!    plain predicates over the enum; there is no role trait.
//!
//! 4. **UTC-only timestamps** truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `coldchain-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, ParseError};
pub use identity::{Address, BatchId, CertificateId};
pub use role::Role;
pub use temporal::Timestamp;
