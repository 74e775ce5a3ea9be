//! # Entity Registry
//!
//! Address to role. Registration is permanent and a role never changes, so
//! every check made against the registry stays true for the lifetime of
//! the ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use coldchain_core::{Address, Role, Timestamp};

use crate::error::LedgerError;

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Participant address (Ed25519 public key).
    pub id: Address,
    /// Role, fixed at registration.
    pub mode: Role,
    /// When the participant was admitted.
    pub registered_at: Timestamp,
}

/// Participant registry.
#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    entities: HashMap<Address, Entity>,
}

impl EntityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `id` with `mode`.
    pub fn register(&mut self, id: Address, mode: Role) -> Result<&Entity, LedgerError> {
        use std::collections::hash_map::Entry;
        match self.entities.entry(id) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyRegistered { entity: id }),
            Entry::Vacant(slot) => Ok(slot.insert(Entity {
                id,
                mode,
                registered_at: Timestamp::now(),
            })),
        }
    }

    /// Role of `id`, if registered.
    pub fn lookup(&self, id: &Address) -> Option<Role> {
        self.entities.get(id).map(|e| e.mode)
    }

    /// Succeeds only if `id` is registered with `expected`.
    pub fn require_role(&self, id: &Address, expected: Role) -> Result<(), LedgerError> {
        match self.lookup(id) {
            Some(actual) if actual == expected => Ok(()),
            actual => Err(LedgerError::UnauthorizedRole {
                entity: *id,
                expected,
                actual,
            }),
        }
    }

    /// The full entity record.
    pub fn get(&self, id: &Address) -> Result<&Entity, LedgerError> {
        self.entities
            .get(id)
            .ok_or(LedgerError::EntityNotFound { entity: *id })
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no one is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
