//! # Participant Roles
//!
//! The three corners of the credential trust triangle. A participant holds
//! exactly one role for its whole lifetime.
//!
//! | Role | Capability | Cold-chain examples |
//! |------|------------|---------------------|
//! | ISSUER | attests facts (signs certificates) | inspector, immunizer |
//! | PROVER | holds credentials about itself | manufacturer, traveler |
//! | VERIFIER | checks credentials at a checkpoint | distributor, border agent |
//!
//! Authorization is a predicate over this closed enum, never a trait object.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseError;

/// A participant's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Attests facts: the only role that may sign a transition certificate.
    Issuer,
    /// Holds credentials: manufacturers and custodians a certificate is about.
    Prover,
    /// Checks credentials: checkpoint witnesses.
    Verifier,
}

impl Role {
    /// All roles in declaration order.
    pub fn all() -> &'static [Role] {
        &[Self::Issuer, Self::Prover, Self::Verifier]
    }

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issuer => "ISSUER",
            Self::Prover => "PROVER",
            Self::Verifier => "VERIFIER",
        }
    }

    /// May sign a transition certificate.
    pub fn can_attest(&self) -> bool {
        matches!(self, Self::Issuer)
    }

    /// May be the subject of a certificate or manufacture a batch.
    pub fn can_hold(&self) -> bool {
        matches!(self, Self::Prover)
    }

    /// May co-sign a transition as a checkpoint witness.
    pub fn can_witness(&self) -> bool {
        matches!(self, Self::Verifier)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ISSUER" => Ok(Self::Issuer),
            "PROVER" => Ok(Self::Prover),
            "VERIFIER" => Ok(Self::Verifier),
            _ => Err(ParseError::UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_capability_per_role() {
        for role in Role::all() {
            let caps = [role.can_attest(), role.can_hold(), role.can_witness()];
            assert_eq!(caps.iter().filter(|c| **c).count(), 1, "{role}");
        }
    }

    #[test]
    fn test_display_and_parse_agree() {
        for role in Role::all() {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), *role);
        }
        assert_eq!("prover".parse::<Role>().unwrap(), Role::Prover);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("REGISTRAR".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case() {
        assert_eq!(serde_json::to_string(&Role::Verifier).unwrap(), "\"VERIFIER\"");
    }
}
