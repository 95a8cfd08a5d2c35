//! # Assignment Ledger (rct-02)
//!
//! Append-only history of randomization decisions and the audit recorder
//! that writes to it.
//!
//! ## Domain Invariants
//!
//! - Records are immutable: the store exposes no update or delete surface.
//! - The full per-site history is the only persistent state the cluster
//!   strategy consults; losing it would break site stickiness.
//! - A record is written after, and only after, a decision succeeds; a
//!   failed decision leaves no partial record.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryAssignmentStore;
pub use domain::errors::LedgerError;
pub use ports::AssignmentStore;
pub use service::AuditRecorder;
