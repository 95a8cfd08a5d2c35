//! # Ledger Errors

use std::fmt;

/// Errors that can occur while reading or appending assignment history.
///
/// The recorder always succeeds unless the underlying store is unavailable,
/// so one variant covers the whole surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The backing store failed or timed out.
    Unavailable { message: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Unavailable { message } => {
                write!(f, "assignment store unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for LedgerError {}
