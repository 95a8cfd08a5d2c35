//! # Request and Response Payloads
//!
//! Typed payloads for registry operations. The gateway deserializes request
//! bodies straight into these; services validate them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{Patient, PatientId, Role, SiteId, StudyId, VariableId};

/// Payload for creating a study.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudy {
    pub name: String,
    #[serde(default)]
    pub protocol_number: Option<String>,
    #[serde(default)]
    pub irb_number: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Strategy value, e.g. "simple" or "cluster". Defaults to "none".
    #[serde(default = "default_randomization_type")]
    pub randomization_type: String,
    #[serde(default)]
    pub is_randomized: bool,
    #[serde(default)]
    pub block_size: Option<u32>,
    #[serde(default)]
    pub stratification_factors: Vec<String>,
}

fn default_randomization_type() -> String {
    "none".to_string()
}

/// Partial update for a study. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyPatch {
    pub name: Option<String>,
    pub protocol_number: Option<String>,
    pub irb_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub randomization_type: Option<String>,
    pub is_randomized: Option<bool>,
    pub block_size: Option<u32>,
    pub stratification_factors: Option<Vec<String>>,
}

/// Payload for adding a treatment arm to a study.
#[derive(Debug, Clone, Deserialize)]
pub struct NewArm {
    pub name: String,
    /// Relative allocation weight. Defaults to 1; zero is rejected.
    #[serde(default)]
    pub allocation_ratio: Option<u32>,
}

/// Payload for creating a site. Name and location are both required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSite {
    pub name: String,
    pub location: String,
}

/// Partial update for a site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitePatch {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Payload for defining a per-study data-collection variable.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVariable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub variable_type: String,
    #[serde(default)]
    pub required: bool,
}

/// One captured variable value submitted with an enrollment.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableValueInput {
    pub variable_id: VariableId,
    pub value: String,
}

/// Payload for enrolling a patient.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub dob: NaiveDate,
    pub sex: String,
    #[serde(default)]
    pub para: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub consent_date: Option<NaiveDate>,
    #[serde(default)]
    pub enrollment_status: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub study_id: Option<StudyId>,
    #[serde(default)]
    pub site_id: Option<SiteId>,
    /// Values for the study's custom variables.
    #[serde(default)]
    pub study_variables: Vec<VariableValueInput>,
}

fn default_true() -> bool {
    true
}

/// Payload for creating a user account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub role: Role,
    pub secret: String,
}

/// A patient's captured variable value joined with its definition.
#[derive(Debug, Clone, Serialize)]
pub struct PatientVariableDetail {
    pub variable_id: VariableId,
    pub variable_name: String,
    pub variable_description: Option<String>,
    pub value: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    pub required: bool,
}

/// Full patient view: demographics plus resolved variable values.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    pub patient: Patient,
    pub variables: Vec<PatientVariableDetail>,
}

impl PatientDetail {
    pub fn id(&self) -> PatientId {
        self.patient.id
    }
}
