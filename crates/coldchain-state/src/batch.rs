//! # Vaccine Batch Lifecycle
//!
//! [`BatchStatus`] is the strictly ordered lifecycle; [`VaccineBatch`] is the
//! record the ledger stores for each tracked shipment unit.
//!
//! A batch does not advance itself in response to callers. The ledger's
//! coordinator calls [`VaccineBatch::advance`] only after the certificate
//! for that hop has been verified and appended, then attaches the new
//! certificate id with [`VaccineBatch::attach_certificate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coldchain_core::{Address, BatchId, CertificateId, ParseError, Timestamp};

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of a vaccine batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum BatchStatus {
    /// Produced and sealed at the manufacturing site. Initial state.
    Manufactured = 0,
    /// In international transit from the manufacturer.
    DeliveringInternational = 1,
    /// Received into a national or regional cold store.
    Stored = 2,
    /// In local transit to the point of care.
    DeliveringLocal = 3,
    /// Delivered to the point of care. Terminal.
    Delivered = 4,
}

impl BatchStatus {
    /// Number of lifecycle states.
    pub const COUNT: usize = 5;

    /// All statuses in lifecycle order.
    pub fn all() -> &'static [BatchStatus] {
        &[
            Self::Manufactured,
            Self::DeliveringInternational,
            Self::Stored,
            Self::DeliveringLocal,
            Self::Delivered,
        ]
    }

    /// Position in the lifecycle (0-4).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// The immediate successor, or `None` for DELIVERED.
    pub fn next(&self) -> Option<BatchStatus> {
        match self {
            Self::Manufactured => Some(Self::DeliveringInternational),
            Self::DeliveringInternational => Some(Self::Stored),
            Self::Stored => Some(Self::DeliveringLocal),
            Self::DeliveringLocal => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// The immediate predecessor, or `None` for MANUFACTURED.
    pub fn previous(&self) -> Option<BatchStatus> {
        match self {
            Self::Manufactured => None,
            Self::DeliveringInternational => Some(Self::Manufactured),
            Self::Stored => Some(Self::DeliveringInternational),
            Self::DeliveringLocal => Some(Self::Stored),
            Self::Delivered => Some(Self::DeliveringLocal),
        }
    }

    /// Whether `to` is the immediate successor of `self`.
    pub fn precedes(&self, to: BatchStatus) -> bool {
        self.next() == Some(to)
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// The canonical upper-case name, as used in signed claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufactured => "MANUFACTURED",
            Self::DeliveringInternational => "DELIVERING_INTERNATIONAL",
            Self::Stored => "STORED",
            Self::DeliveringLocal => "DELIVERING_LOCAL",
            Self::Delivered => "DELIVERED",
        }
    }

    /// All four forward edges in lifecycle order.
    pub fn edges() -> Vec<StatusEdge> {
        Self::all()
            .iter()
            .filter_map(|s| s.next().map(|n| StatusEdge { from: *s, to: n }))
            .collect()
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|st| st.as_str() == upper)
            .ok_or_else(|| ParseError::UnknownVariant {
                kind: "batch status",
                value: s.to_string(),
            })
    }
}

// ─── Edges ───────────────────────────────────────────────────────────

/// A `(from, to)` status pair. Written `FROM->TO` in configuration files.
///
/// Construction does not require the pair to be a real lifecycle edge;
/// [`StatusEdge::is_forward_hop`] tells the two apart so configuration
/// loaders can reject bogus entries with a precise message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusEdge {
    /// Status before the hop.
    pub from: BatchStatus,
    /// Status after the hop.
    pub to: BatchStatus,
}

impl StatusEdge {
    /// Pair two statuses.
    pub fn new(from: BatchStatus, to: BatchStatus) -> Self {
        Self { from, to }
    }

    /// Whether `to` immediately follows `from`.
    pub fn is_forward_hop(&self) -> bool {
        self.from.precedes(self.to)
    }
}

impl std::fmt::Display for StatusEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl std::str::FromStr for StatusEdge {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s.split_once("->").ok_or_else(|| ParseError::UnknownVariant {
            kind: "status edge",
            value: s.to_string(),
        })?;
        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

impl Serialize for StatusEdge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusEdge {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by batch record operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// `to` is not the immediate successor of the current status.
    #[error("{batch_id}: invalid transition {from} -> {to}")]
    InvalidTransition {
        /// The batch.
        batch_id: BatchId,
        /// Current status.
        from: BatchStatus,
        /// Requested status.
        to: BatchStatus,
    },

    /// The batch is DELIVERED and accepts no further transitions.
    #[error("{batch_id} is DELIVERED and cannot transition")]
    TerminalState {
        /// The batch.
        batch_id: BatchId,
    },

    /// Brand names must contain a non-whitespace character.
    #[error("batch brand must not be empty")]
    InvalidBrand,
}

// ─── Batch record ────────────────────────────────────────────────────

/// A tracked vaccine shipment unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineBatch {
    /// Sequential id assigned by the ledger.
    pub id: BatchId,
    /// Vaccine brand, e.g. "Pfizer-BioNTech".
    pub brand: String,
    /// The PROVER that manufactured the batch.
    pub manufacturer: Address,
    /// Current lifecycle status.
    pub status: BatchStatus,
    /// Certificates for each hop taken so far, in issuance order.
    pub certificate_ids: Vec<CertificateId>,
    /// When the batch was registered.
    pub created_at: Timestamp,
}

impl VaccineBatch {
    /// A new batch in MANUFACTURED with no certificates.
    pub fn new(id: BatchId, brand: &str, manufacturer: Address) -> Result<Self, BatchError> {
        let brand = brand.trim();
        if brand.is_empty() {
            return Err(BatchError::InvalidBrand);
        }
        Ok(Self {
            id,
            brand: brand.to_string(),
            manufacturer,
            status: BatchStatus::Manufactured,
            certificate_ids: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Validate a move to `to` without applying it. Returns the current
    /// status (the `from` of the hop).
    pub fn check_advance(&self, to: BatchStatus) -> Result<BatchStatus, BatchError> {
        if self.status.is_terminal() {
            return Err(BatchError::TerminalState { batch_id: self.id });
        }
        if !self.status.precedes(to) {
            return Err(BatchError::InvalidTransition {
                batch_id: self.id,
                from: self.status,
                to,
            });
        }
        Ok(self.status)
    }

    /// Move to `to`, which must be the immediate successor. Returns the
    /// previous status.
    pub fn advance(&mut self, to: BatchStatus) -> Result<BatchStatus, BatchError> {
        let from = self.check_advance(to)?;
        self.status = to;
        Ok(from)
    }

    /// Record the certificate that justified the latest hop.
    pub fn attach_certificate(&mut self, certificate_id: CertificateId) {
        self.certificate_ids.push(certificate_id);
    }

    /// Whether the batch has reached the point of care.
    pub fn is_delivered(&self) -> bool {
        self.status.is_terminal()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
