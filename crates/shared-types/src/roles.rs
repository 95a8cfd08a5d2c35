//! # Roles and Authorization Policy
//!
//! Closed enumeration of roles plus the operation → allowed-roles table.
//!
//! Ownership-sensitive rules (a study manager may only touch studies they
//! created) are enforced by the owning service; this table answers the
//! coarser question "may this role ever perform this operation".

use serde::{Deserialize, Serialize};

use crate::entities::UserId;

/// Account roles, replacing free-form role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(rename = "studymanager")]
    StudyManager,
    Staff,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "studymanager" => Some(Self::StudyManager),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::StudyManager => "studymanager",
            Self::Staff => "staff",
        }
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ManageUsers,
    ManageSites,
    CreateStudy,
    UpdateStudy,
    AssignSite,
    ManageArms,
    ManageVariables,
    EnrollPatient,
    ViewPatient,
    Randomize,
    ListStudies,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// The policy table.
///
/// Admins may do everything; study managers run their own studies; staff
/// enroll, view, and randomize.
pub fn is_allowed(role: Role, operation: Operation) -> bool {
    use Operation::*;

    match role {
        Role::Admin => true,
        Role::StudyManager => matches!(
            operation,
            CreateStudy
                | UpdateStudy
                | AssignSite
                | ManageArms
                | ManageVariables
                | EnrollPatient
                | ViewPatient
                | Randomize
                | ListStudies
        ),
        Role::Staff => matches!(
            operation,
            EnrollPatient | ViewPatient | Randomize | ListStudies
        ),
    }
}
