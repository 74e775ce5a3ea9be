//! # Ed25519 Signing and Verification
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`. Every party recomputes the
//!   transition claim through the same JCS pipeline before signing or
//!   verifying, so a signature made by one implementation verifies in any
//!   other.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does not
//!   implement `Serialize` and its `Debug` output is redacted.
//! - Verification takes the signer's [`Address`]; the address is the public
//!   key.
//!
//! ## Serde
//!
//! Signatures serialize as 128-char lowercase hex strings.

use ed25519_dalek::Signer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use coldchain_core::error::{decode_hex_array, encode_hex};
use coldchain_core::{Address, CanonicalBytes};

use crate::error::CryptoError;

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 key pair held by a participant.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Parse a signature from a 128-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        Ok(Self(decode_hex_array::<64>("signature", hex)?))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", encode_hex(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random key pair from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Deterministic key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Key pair from a 64-char hex seed.
    pub fn from_seed_hex(hex: &str) -> Result<Self, CryptoError> {
        let seed = decode_hex_array::<32>("seed", hex)?;
        Ok(Self::from_seed(&seed))
    }

    /// The 32-byte seed as hex. Only key-export paths (CLI `keygen`) call this.
    pub fn seed_hex(&self) -> String {
        encode_hex(&self.signing_key.to_bytes())
    }

    /// The participant address (public key) of this key pair.
    pub fn address(&self) -> Address {
        Address::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify `signature` over `data` against the signer's address.
///
/// Uses `verify_strict`, which rejects small-order keys and non-canonical
/// `R` encodings, so one message has one valid signature per key.
pub fn verify(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    signer: &Address,
) -> Result<(), CryptoError> {
    let vk = ed25519_dalek::VerifyingKey::from_bytes(signer.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify_strict(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
}

/// Boolean form of [`verify()`].
pub fn is_valid(data: &CanonicalBytes, signature: &Ed25519Signature, signer: &Address) -> bool {
    verify(data, signature, signer).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(n: u64) -> CanonicalBytes {
        CanonicalBytes::new(&serde_json::json!({"batchId": n, "toStatus": "STORED"})).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let data = claim(0);
        let sig = kp.sign(&data);
        verify(&data, &sig, &kp.address()).expect("valid signature should verify");
        assert!(is_valid(&data, &sig, &kp.address()));
    }

    #[test]
    fn test_wrong_signer_fails() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let data = claim(1);
        let sig = kp1.sign(&data);
        assert!(!is_valid(&data, &sig, &kp2.address()));
    }

    #[test]
    fn test_wrong_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&claim(1));
        let err = verify(&claim(2), &sig, &kp.address()).unwrap_err();
        assert!(matches!(err, CryptoError::VerificationFailed(_)));
    }

    #[test]
    fn test_flipped_bit_fails() {
        let kp = Ed25519KeyPair::from_seed(&[3u8; 32]);
        let data = claim(7);
        let mut bytes = *kp.sign(&data).as_bytes();
        bytes[10] ^= 0x01;
        assert!(!is_valid(&data, &Ed25519Signature::from_bytes(bytes), &kp.address()));
    }

    #[test]
    fn test_deterministic_from_seed() {
        let kp1 = Ed25519KeyPair::from_seed(&[42u8; 32]);
        let kp2 = Ed25519KeyPair::from_seed_hex(&"2a".repeat(32)).unwrap();
        assert_eq!(kp1.address(), kp2.address());
        assert_eq!(kp1.sign(&claim(3)), kp2.sign(&claim(3)));
        assert_eq!(kp1.seed_hex(), "2a".repeat(32));
    }

    #[test]
    fn test_signature_serde_is_hex() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&claim(4));
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 128 + 2);
        let back: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_signature_invalid_hex() {
        assert!(Ed25519Signature::from_hex("not-hex").is_err());
        assert!(Ed25519Signature::from_hex(&"zz".repeat(64)).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::from_seed(&[9u8; 32]);
        let debug = format!("{kp:?}");
        assert_eq!(debug, "Ed25519KeyPair(<private>)");
        assert!(!debug.contains("09"));
    }

    #[test]
    fn test_keypair_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ed25519KeyPair>();
        assert_send_sync::<Ed25519Signature>();
    }
}
