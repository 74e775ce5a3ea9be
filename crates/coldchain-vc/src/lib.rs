//! # coldchain-vc: Transition Certificates
//!
//! A transition certificate is a verifiable credential with a fixed shape:
//! an ISSUER attests that a batch moved from one lifecycle status to the
//! next, about a PROVER subject, with evidence committed by digest.
//!
//! - **Claims** ([`TransitionClaim`]) are the five signed fields. Their
//!   canonical bytes are the only signing input.
//! - **Certificates** ([`Certificate`]) are the ledger records: the claim,
//!   the issuer's signature, an optional checkpoint [`Witness`]
//!   co-signature, and issuance metadata.
//!
//! ## Security Invariants
//!
//! - Signing and verification both go through
//!   [`CanonicalBytes`](coldchain_core::CanonicalBytes); no raw
//!   `serde_json::to_vec()` is ever signed.
//! - A certificate's claim is recomputed from its stored fields on every
//!   verification, so editing any stored field breaks the signature.

pub mod certificate;
pub mod claim;

pub use certificate::{Certificate, Witness};
pub use claim::{TransitionClaim, VcError};
