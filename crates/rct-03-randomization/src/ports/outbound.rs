//! # Outbound Ports (Driven Ports)
//!
//! What the randomization service requires from the host: a read-only view
//! of study configuration and a write path into the assignment history.
//! Adapters translate their subsystem's errors into `RandomizationError`
//! (store failures become `StorageUnavailable`).

use shared_types::{
    AssignmentRecord, PatientId, RandomizationConfig, SiteId, StratificationValues, StudyId,
    TreatmentArm, UserId,
};

use crate::domain::errors::RandomizationError;

/// Read access to a study's randomization configuration and arms.
pub trait StudyResolver: Send + Sync {
    /// Resolves the study's configuration and current arm list.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: the study does not exist
    /// - `NotRandomized`: the study is not flagged for randomization
    /// - `NoArmsDefined`: the study has no arms
    /// - `StorageUnavailable`: the registry store failed
    fn resolve(
        &self,
        study_id: StudyId,
    ) -> Result<(RandomizationConfig, Vec<TreatmentArm>), RandomizationError>;
}

/// A decision ready to be persisted.
#[derive(Debug, Clone)]
pub struct AssignmentDecision {
    pub patient_id: PatientId,
    pub arm: TreatmentArm,
    pub stratification_values: StratificationValues,
    pub site_id: Option<SiteId>,
    pub recorded_by: UserId,
}

/// Read/write access to the assignment history.
pub trait AssignmentLedger: Send + Sync {
    /// Assignment history for a site, oldest first.
    fn site_history(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, RandomizationError>;

    /// Persists a decision as an immutable record, stamping the timestamp.
    fn record(
        &self,
        decision: &AssignmentDecision,
    ) -> Result<AssignmentRecord, RandomizationError>;
}

impl<T: StudyResolver + ?Sized> StudyResolver for std::sync::Arc<T> {
    fn resolve(
        &self,
        study_id: StudyId,
    ) -> Result<(RandomizationConfig, Vec<TreatmentArm>), RandomizationError> {
        (**self).resolve(study_id)
    }
}

impl<T: AssignmentLedger + ?Sized> AssignmentLedger for std::sync::Arc<T> {
    fn site_history(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, RandomizationError> {
        (**self).site_history(site_id)
    }
    fn record(
        &self,
        decision: &AssignmentDecision,
    ) -> Result<AssignmentRecord, RandomizationError> {
        (**self).record(decision)
    }
}
