//! # Core Domain Entities
//!
//! Defines the clinical-trial entities shared across subsystems.
//!
//! ## Clusters
//!
//! - **Trial setup**: `Study`, `TreatmentArm`, `Site`, `StudySiteLink`,
//!   `StudyVariable`
//! - **Enrollment**: `Patient`, `PatientVariableValue`
//! - **Randomization**: `RandomizationConfig`, `RandomizationType`,
//!   `AssignmentRecord`
//! - **Identity**: `User`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::roles::Role;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Unique identifier for a study.
    StudyId
);
id_newtype!(
    /// Unique identifier for a clinical site.
    SiteId
);
id_newtype!(
    /// Unique identifier for a treatment arm.
    ArmId
);
id_newtype!(
    /// Unique identifier for an enrolled patient.
    PatientId
);
id_newtype!(
    /// Unique identifier for a user account.
    UserId
);
id_newtype!(
    /// Unique identifier for a per-study data-collection variable.
    VariableId
);
id_newtype!(
    /// Unique identifier for an assignment record.
    RecordId
);

/// Flat key→value stratification map, serialized as a JSON object.
pub type StratificationValues = BTreeMap<String, String>;

// =============================================================================
// CLUSTER A: TRIAL SETUP
// =============================================================================

/// A clinical study (trial).
///
/// `randomization_type` is stored as the configured text value so that a
/// misconfigured study surfaces as `UnsupportedRandomizationType` at
/// assignment time instead of being silently coerced; the recognised values
/// are parsed via [`RandomizationType::parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub id: StudyId,
    pub name: String,
    pub protocol_number: Option<String>,
    pub irb_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Configured randomization strategy, free-form as stored.
    pub randomization_type: String,
    /// When false, the randomization engine must never run for this study.
    pub is_randomized: bool,
    /// Stored for block randomization; not consulted by selection (the block
    /// strategy is per-call weighted-random, see the engine docs).
    pub block_size: Option<u32>,
    /// Ordered stratification factor names.
    pub stratification_factors: Vec<String>,
    pub created_by: UserId,
    pub updated_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One of the parallel intervention groups of a study.
///
/// Arm names are unique within their study. Arms are owned by the study and
/// removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentArm {
    pub id: ArmId,
    pub study_id: StudyId,
    pub name: String,
    /// Relative allocation weight, >= 1.
    pub allocation_ratio: u32,
}

/// A clinical site where patients are seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Membership of a site in a study.
///
/// A site with at least one link cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySiteLink {
    pub study_id: StudyId,
    pub site_id: SiteId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// A per-study custom data-collection variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyVariable {
    pub id: VariableId,
    pub study_id: StudyId,
    pub name: String,
    pub description: Option<String>,
    /// Collection type, e.g. "text", "number", "date".
    pub variable_type: String,
    pub required: bool,
}

// =============================================================================
// CLUSTER B: ENROLLMENT
// =============================================================================

/// An enrolled patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub dob: NaiveDate,
    pub sex: String,
    pub para: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub ethnicity: Option<String>,
    pub notes: Option<String>,
    pub consent_date: Option<NaiveDate>,
    pub enrollment_status: Option<String>,
    pub is_active: bool,
    pub study_id: Option<StudyId>,
    pub site_id: Option<SiteId>,
    pub entered_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The captured value of one study variable for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientVariableValue {
    pub patient_id: PatientId,
    pub variable_id: VariableId,
    pub value: String,
}

// =============================================================================
// CLUSTER C: RANDOMIZATION
// =============================================================================

/// Read-only view of a study's randomization configuration.
///
/// This is the registry's output and the engine's input; it carries exactly
/// the fields selection may consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizationConfig {
    pub study_id: StudyId,
    pub randomization_type: String,
    pub block_size: Option<u32>,
    pub stratification_factors: Vec<String>,
}

/// Recognised randomization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomizationType {
    Simple,
    Block,
    Stratified,
    Cluster,
    /// Configured but never randomized; the engine refuses this value.
    None,
}

impl RandomizationType {
    /// Parses a stored strategy value. Unknown values return `None` and are
    /// reported as `UnsupportedRandomizationType` by the engine.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "simple" => Some(Self::Simple),
            "block" => Some(Self::Block),
            "stratified" => Some(Self::Stratified),
            "cluster" => Some(Self::Cluster),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Block => "block",
            Self::Stratified => "stratified",
            Self::Cluster => "cluster",
            Self::None => "none",
        }
    }
}

/// Immutable audit fact: one randomization decision.
///
/// Records are append-only; the per-site history is the only persistent
/// state the cluster strategy consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: RecordId,
    pub patient_id: PatientId,
    /// Name of the assigned arm at the time of the decision.
    pub arm_name: String,
    pub assigned_at: DateTime<Utc>,
    /// Stratification values captured with the decision.
    pub stratification_values: StratificationValues,
    pub recorded_by: UserId,
    pub site_id: Option<SiteId>,
}

// =============================================================================
// CLUSTER D: IDENTITY
// =============================================================================

/// A user account. Credentials live behind the `UserDirectory` port and are
/// never part of this entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}
