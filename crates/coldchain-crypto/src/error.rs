//! # Cryptographic Error Types

use coldchain_core::ParseError;
use thiserror::Error;

/// Errors from signature and digest operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("Ed25519 verification failed: {0}")]
    VerificationFailed(String),

    /// The address bytes are not a valid Ed25519 point.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),

    /// Hex decoding of a key or signature failed.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] ParseError),

    /// Canonicalization of the payload failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] coldchain_core::CanonicalizationError),
}
