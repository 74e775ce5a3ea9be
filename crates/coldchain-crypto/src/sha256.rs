//! # Payload Digests
//!
//! A certificate does not embed its evidence document; it embeds the
//! document's digest (`payloadHash`). The document is canonicalized first so
//! the digest depends on content, not on key order or whitespace.

use serde::Serialize;

use coldchain_core::{sha256_digest, CanonicalBytes, ContentDigest};

use crate::error::CryptoError;

/// SHA-256 over the canonical encoding of an evidence document.
pub fn payload_digest(document: &impl Serialize) -> Result<ContentDigest, CryptoError> {
    let canonical = CanonicalBytes::new(document)?;
    Ok(sha256_digest(&canonical))
}
