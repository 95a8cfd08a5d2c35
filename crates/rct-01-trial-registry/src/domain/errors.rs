//! # Registry Errors
//!
//! Error types for the Trial Registry subsystem. Each variant corresponds to
//! a specific refusal; no operation silently falls through to a default.

use shared_types::{PatientId, SiteId, StudyId, UserId, VariableId};
use std::fmt;

use crate::ports::StoreError;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No study with this id exists.
    StudyNotFound { study_id: StudyId },

    /// No site with this id exists.
    SiteNotFound { site_id: SiteId },

    /// No patient with this id exists.
    PatientNotFound { patient_id: PatientId },

    /// No user with this id exists.
    UserNotFound { user_id: UserId },

    /// The study exists but is not configured for randomization.
    NotRandomized { study_id: StudyId },

    /// The study is flagged for randomization but has no treatment arms.
    NoArmsDefined { study_id: StudyId },

    /// The caller's role (or ownership) does not permit this operation.
    AccessDenied { operation: &'static str },

    /// An entity with this name already exists in its uniqueness scope.
    DuplicateName { entity: &'static str, name: String },

    /// The site is already assigned to the study.
    DuplicateSiteAssignment { study_id: StudyId, site_id: SiteId },

    /// The site is linked to at least one study and cannot be deleted.
    SiteInUse { site_id: SiteId },

    /// A variable value referenced a variable not defined for the study.
    UnknownVariable { variable_id: VariableId },

    /// A request payload failed validation.
    Validation { message: String },

    /// The backing store failed or timed out.
    Store { message: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::StudyNotFound { study_id } => {
                write!(f, "Study {} not found", study_id)
            }
            RegistryError::SiteNotFound { site_id } => {
                write!(f, "Site {} not found", site_id)
            }
            RegistryError::PatientNotFound { patient_id } => {
                write!(f, "Patient {} not found", patient_id)
            }
            RegistryError::UserNotFound { user_id } => {
                write!(f, "User {} not found", user_id)
            }
            RegistryError::NotRandomized { study_id } => {
                write!(f, "Study {} is not configured for randomization", study_id)
            }
            RegistryError::NoArmsDefined { study_id } => {
                write!(f, "No treatment arms defined for study {}", study_id)
            }
            RegistryError::AccessDenied { operation } => {
                write!(f, "Access denied for {}", operation)
            }
            RegistryError::DuplicateName { entity, name } => {
                write!(f, "A {} named '{}' already exists", entity, name)
            }
            RegistryError::DuplicateSiteAssignment { study_id, site_id } => {
                write!(
                    f,
                    "Site {} is already assigned to study {}",
                    site_id, study_id
                )
            }
            RegistryError::SiteInUse { site_id } => {
                write!(f, "Cannot delete: site {} is linked to a study", site_id)
            }
            RegistryError::UnknownVariable { variable_id } => {
                write!(f, "Variable {} is not defined for this study", variable_id)
            }
            RegistryError::Validation { message } => write!(f, "{}", message),
            RegistryError::Store { message } => write!(f, "Store error: {}", message),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        RegistryError::Store {
            message: err.to_string(),
        }
    }
}
