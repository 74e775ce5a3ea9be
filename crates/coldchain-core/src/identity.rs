//! # Identifier Newtypes
//!
//! `Address` identifies a participant. It is the participant's Ed25519
//! public key, so a signature "by" an address is checked against the
//! address itself and no separate key directory exists.
//!
//! `BatchId` and `CertificateId` are sequential counters assigned by the
//! ledger. They serialize as plain JSON integers because `batchId` appears
//! in the signed transition claim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{decode_hex_array, encode_hex, ParseError};

/// A participant identifier: a 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 chars).
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Parse a 64-char hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        decode_hex_array::<32>("address", hex).map(Self)
    }

    /// First four bytes as hex, for log lines.
    pub fn short(&self) -> String {
        encode_hex(&self.0[..4])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({}...)", self.short())
    }
}

impl std::str::FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Sequential vaccine batch identifier, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub u64);

/// Sequential ledger-wide certificate identifier, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(pub u64);

impl BatchId {
    /// The raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl CertificateId {
    /// The raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch:{}", self.0)
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "certificate:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_roundtrip() {
        let a = Address::from_bytes([7u8; 32]);
        assert_eq!(a.to_hex().len(), 64);
        assert_eq!(Address::from_hex(&a.to_hex()).unwrap(), a);
    }

    #[test]
    fn test_address_serializes_as_hex_string() {
        let a = Address::from_bytes([0x11; 32]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", "11".repeat(32)));
    }

    #[test]
    fn test_address_debug_is_short() {
        let a = Address::from_bytes([0xfe; 32]);
        assert_eq!(format!("{a:?}"), "Address(fefefefe...)");
    }

    #[test]
    fn test_address_rejects_short_input() {
        assert!(Address::from_hex("abcd").is_err());
    }

    #[test]
    fn test_ids_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&BatchId(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&CertificateId(9)).unwrap(), "9");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(BatchId(0).to_string(), "batch:0");
        assert_eq!(CertificateId(12).to_string(), "certificate:12");
    }
}
