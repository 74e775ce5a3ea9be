//! # coldchain-state: Batch Lifecycle State Machine
//!
//! ```text
//! MANUFACTURED ──▶ DELIVERING_INTERNATIONAL ──▶ STORED ──▶ DELIVERING_LOCAL ──▶ DELIVERED
//! ```
//!
//! Five states, one edge out of each non-terminal state. A batch only ever
//! moves to the immediate successor of its current status; it never moves
//! backward, never skips, and never leaves DELIVERED.
//!
//! ## Design
//!
//! The lifecycle is a plain enum with a validated `advance()` rather than
//! typestate. Batch records are stored in a shared ledger keyed by id and
//! their status is only known at runtime, so the check has to happen at
//! runtime anyway; the enum keeps that check in one place
//! ([`BatchStatus::next`]).

pub mod batch;

pub use batch::{BatchError, BatchStatus, StatusEdge, VaccineBatch};
