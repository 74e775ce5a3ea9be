//! # coldchain-crypto: Signature Engine
//!
//! - **Ed25519** key pairs, signing and verification. Participants are
//!   identified by their public key ([`Address`](coldchain_core::Address)),
//!   so verification takes an address directly.
//! - **Payload digests**: SHA-256 over the canonical encoding of an evidence
//!   document.
//!
//! Everything here is pure and stateless; all types are `Send + Sync`.
//!
//! ## Crate Policy
//!
//! - Depends only on `coldchain-core` internally.
//! - No mocking of cryptographic operations in tests. Tests use real
//!   `CanonicalBytes`, real SHA-256, real Ed25519.
//! - Signing input is always `&CanonicalBytes`, never raw `&[u8]`.

pub mod ed25519;
pub mod error;
pub mod sha256;

pub use ed25519::{is_valid, verify, Ed25519KeyPair, Ed25519Signature};
pub use error::CryptoError;
pub use sha256::payload_digest;
