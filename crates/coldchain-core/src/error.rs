//! # Error Types
//!
//! Errors raised by the foundational types. Domain errors (authorization,
//! lifecycle, integrity) live in the crates that own those concerns and
//! wrap these where needed.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Quantities (temperatures, counts) must be integers or strings.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a textual representation of a core type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Hex input had the wrong length for the target type.
    #[error("{kind} hex must be {expected} chars, got {actual}")]
    HexLength {
        /// Name of the type being parsed.
        kind: &'static str,
        /// Required number of hex characters.
        expected: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// Hex input contained a non-hex character.
    #[error("invalid hex at position {position}")]
    HexDigit {
        /// Byte offset of the offending pair.
        position: usize,
    },

    /// Unknown enum name.
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant {
        /// Name of the enum being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Digest algorithm prefix was missing or unsupported.
    #[error("unsupported digest algorithm: {0:?}")]
    DigestAlgorithm(String),

    /// Timestamp text was not a UTC RFC 3339 instant.
    #[error("invalid timestamp {value:?}: {reason}")]
    Timestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Decode a lowercase or uppercase hex string into exactly `N` bytes.
///
/// Shared by every fixed-width hex type in the workspace (addresses,
/// digests, signatures).
pub fn decode_hex_array<const N: usize>(
    kind: &'static str,
    hex: &str,
) -> Result<[u8; N], ParseError> {
    let hex = hex.trim();
    if hex.len() != N * 2 {
        return Err(ParseError::HexLength {
            kind,
            expected: N * 2,
            actual: hex.len(),
        });
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        let pair = hex
            .get(i * 2..i * 2 + 2)
            .ok_or(ParseError::HexDigit { position: i * 2 })?;
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| ParseError::HexDigit { position: i * 2 })?;
    }
    Ok(out)
}

/// Render bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_mixed_case() {
        let out: [u8; 2] = decode_hex_array("test", "aBcD").unwrap();
        assert_eq!(out, [0xab, 0xcd]);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = decode_hex_array::<2>("test", "abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::HexLength {
                kind: "test",
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn decode_rejects_non_hex() {
        let err = decode_hex_array::<2>("test", "zz00").unwrap_err();
        assert_eq!(err, ParseError::HexDigit { position: 0 });
    }

    #[test]
    fn decode_rejects_multibyte_utf8_without_panicking() {
        // 4 bytes long but not valid at char boundaries.
        assert!(decode_hex_array::<2>("test", "é00").is_err());
    }

    #[test]
    fn encode_is_lowercase() {
        assert_eq!(encode_hex(&[0xAB, 0x01]), "ab01");
    }
}
