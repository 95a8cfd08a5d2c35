//! # Randomization Errors
//!
//! The full failure taxonomy for arm assignment. Every variant aborts the
//! operation; the engine never guesses an arm when its logic cannot
//! determine one. Retrying makes sense only for `StorageUnavailable`.

use shared_types::{SiteId, StudyId};
use std::fmt;

/// Errors that can occur during randomization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomizationError {
    /// A referenced study or site does not exist (or, for the cluster
    /// strategy, no site was supplied).
    NotFound { resource: &'static str },

    /// The study is not configured for randomization.
    NotRandomized { study_id: StudyId },

    /// The study has no treatment arms.
    NoArmsDefined { study_id: StudyId },

    /// The configured strategy value is not recognised.
    UnsupportedRandomizationType { type_name: String },

    /// A prior cluster record names an arm that no longer exists among the
    /// study's current arms.
    StaleClusterAssignment { site_id: SiteId, arm_name: String },

    /// No arm could be resolved from an otherwise valid configuration.
    AssignmentFailed,

    /// The registry or ledger store failed or timed out.
    StorageUnavailable { message: String },
}

impl RandomizationError {
    pub fn storage(message: impl Into<String>) -> Self {
        RandomizationError::StorageUnavailable {
            message: message.into(),
        }
    }
}

impl fmt::Display for RandomizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomizationError::NotFound { resource } => {
                write!(f, "{} not found", resource)
            }
            RandomizationError::NotRandomized { study_id } => {
                write!(f, "Study {} is not configured for randomization", study_id)
            }
            RandomizationError::NoArmsDefined { study_id } => {
                write!(f, "No treatment arms defined for study {}", study_id)
            }
            RandomizationError::UnsupportedRandomizationType { type_name } => {
                write!(f, "Unsupported randomization type: {}", type_name)
            }
            RandomizationError::StaleClusterAssignment { site_id, arm_name } => {
                write!(
                    f,
                    "Site {} is fixed to arm '{}', which no longer exists in this study",
                    site_id, arm_name
                )
            }
            RandomizationError::AssignmentFailed => {
                write!(f, "Unable to assign treatment arm")
            }
            RandomizationError::StorageUnavailable { message } => {
                write!(f, "Storage unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for RandomizationError {}
