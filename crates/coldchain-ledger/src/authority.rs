//! # Registrar Authority
//!
//! Registering participants and creating batches are privileged. The ledger
//! is configured with the registrar's [`Address`]; the caller proves it is
//! the registrar by holding an [`Authority`], which endorses each request
//! by signing its canonical form. The coordinator checks the endorsement
//! against the configured address before touching state.

use serde::Serialize;

use coldchain_core::{Address, CanonicalBytes, Role};
use coldchain_crypto::{Ed25519KeyPair, Ed25519Signature};

use crate::error::LedgerError;

/// A privileged request, in the form the registrar signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RegistrarRequest {
    /// Admit a participant with a fixed role.
    #[serde(rename_all = "camelCase")]
    RegisterEntity {
        /// The participant.
        entity: Address,
        /// Its role.
        mode: Role,
    },
    /// Create a batch.
    #[serde(rename_all = "camelCase")]
    CreateBatch {
        /// Vaccine brand.
        brand: String,
        /// Manufacturing PROVER.
        manufacturer: Address,
    },
}

impl RegistrarRequest {
    /// The signing input.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, LedgerError> {
        Ok(CanonicalBytes::new(self)?)
    }
}

/// A signature over a [`RegistrarRequest`] with the signer's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endorsement {
    /// Who signed.
    pub signer: Address,
    /// Signature over the request's canonical bytes.
    pub signature: Ed25519Signature,
}

/// Holder of a registrar signing key.
#[derive(Debug)]
pub struct Authority {
    key: Ed25519KeyPair,
}

impl Authority {
    /// Wrap an existing key pair.
    pub fn new(key: Ed25519KeyPair) -> Self {
        Self { key }
    }

    /// A fresh random registrar key.
    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    /// The registrar address this authority signs as.
    pub fn address(&self) -> Address {
        self.key.address()
    }

    /// Sign a request.
    pub fn endorse(&self, request: &RegistrarRequest) -> Result<Endorsement, LedgerError> {
        Ok(Endorsement {
            signer: self.key.address(),
            signature: self.key.sign(&request.canonical_bytes()?),
        })
    }
}

/// Check that `endorsement` is `registrar`'s signature over `request`.
pub(crate) fn check_endorsement(
    registrar: &Address,
    request: &RegistrarRequest,
    endorsement: &Endorsement,
) -> Result<(), LedgerError> {
    let rejected = LedgerError::UnauthorizedRegistrar {
        caller: endorsement.signer,
    };
    if endorsement.signer != *registrar {
        return Err(rejected);
    }
    let canonical = request.canonical_bytes()?;
    coldchain_crypto::verify(&canonical, &endorsement.signature, registrar).map_err(|_| rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegistrarRequest {
        RegistrarRequest::RegisterEntity {
            entity: Address::from_bytes([4; 32]),
            mode: Role::Prover,
        }
    }

    #[test]
    fn test_canonical_form() {
        let req = RegistrarRequest::CreateBatch {
            brand: "Moderna".to_string(),
            manufacturer: Address::from_bytes([0; 32]),
        };
        assert_eq!(
            req.canonical_bytes().unwrap().as_str(),
            format!(
                "{{\"brand\":\"Moderna\",\"manufacturer\":\"{}\",\"op\":\"createBatch\"}}",
                "00".repeat(32)
            )
        );
    }

    #[test]
    fn test_registrar_endorsement_accepted() {
        let authority = Authority::new(Ed25519KeyPair::from_seed(&[8; 32]));
        let e = authority.endorse(&request()).unwrap();
        check_endorsement(&authority.address(), &request(), &e).unwrap();
    }

    #[test]
    fn test_other_key_rejected() {
        let registrar = Authority::new(Ed25519KeyPair::from_seed(&[8; 32]));
        let impostor = Authority::new(Ed25519KeyPair::from_seed(&[9; 32]));
        let e = impostor.endorse(&request()).unwrap();
        let err = check_endorsement(&registrar.address(), &request(), &e).unwrap_err();
        assert!(matches!(err, LedgerError::UnauthorizedRegistrar { caller } if caller == impostor.address()));
    }

    #[test]
    fn test_forged_signer_field_rejected() {
        let registrar = Authority::new(Ed25519KeyPair::from_seed(&[8; 32]));
        let impostor = Authority::new(Ed25519KeyPair::from_seed(&[9; 32]));
        let mut e = impostor.endorse(&request()).unwrap();
        e.signer = registrar.address();
        assert!(check_endorsement(&registrar.address(), &request(), &e).is_err());
    }

    #[test]
    fn test_endorsement_bound_to_request() {
        let registrar = Authority::new(Ed25519KeyPair::from_seed(&[8; 32]));
        let e = registrar.endorse(&request()).unwrap();
        let other = RegistrarRequest::RegisterEntity {
            entity: Address::from_bytes([4; 32]),
            mode: Role::Issuer,
        };
        assert!(check_endorsement(&registrar.address(), &other, &e).is_err());
    }
}
