//! Port traits required by the randomization service.

pub mod outbound;

pub use outbound::{AssignmentDecision, AssignmentLedger, StudyResolver};
