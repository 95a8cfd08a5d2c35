//! # Randomization Port Adapters
//!
//! The randomization service is written against two outbound ports,
//! [`StudyResolver`] and [`AssignmentLedger`]. Here they are implemented
//! over the registry service and the audit recorder, translating each
//! subsystem's errors into the randomization taxonomy (store failures
//! become `StorageUnavailable`).

use rct_01_trial_registry::{
    Clock, RegistryError, RegistryService, SiteStore, StudyStore, VariableStore,
};
use rct_02_assignment_ledger::{AssignmentStore, AuditRecorder, LedgerError};
use rct_03_randomization::{
    AssignmentDecision, AssignmentLedger, RandomizationError, StudyResolver,
};
use shared_types::{AssignmentRecord, RandomizationConfig, SiteId, StudyId, TreatmentArm};
use std::sync::Arc;

/// [`StudyResolver`] over the registry service.
pub struct RegistryResolver<ST, SI, VA, C>
where
    ST: StudyStore,
    SI: SiteStore,
    VA: VariableStore,
    C: Clock,
{
    registry: Arc<RegistryService<ST, SI, VA, C>>,
}

impl<ST, SI, VA, C> RegistryResolver<ST, SI, VA, C>
where
    ST: StudyStore,
    SI: SiteStore,
    VA: VariableStore,
    C: Clock,
{
    pub fn new(registry: Arc<RegistryService<ST, SI, VA, C>>) -> Self {
        Self { registry }
    }
}

impl<ST, SI, VA, C> StudyResolver for RegistryResolver<ST, SI, VA, C>
where
    ST: StudyStore,
    SI: SiteStore,
    VA: VariableStore,
    C: Clock,
{
    fn resolve(
        &self,
        study_id: StudyId,
    ) -> Result<(RandomizationConfig, Vec<TreatmentArm>), RandomizationError> {
        self.registry.resolve(study_id).map_err(resolve_error)
    }
}

fn resolve_error(err: RegistryError) -> RandomizationError {
    match err {
        RegistryError::StudyNotFound { .. } => RandomizationError::NotFound { resource: "study" },
        RegistryError::NotRandomized { study_id } => {
            RandomizationError::NotRandomized { study_id }
        }
        RegistryError::NoArmsDefined { study_id } => {
            RandomizationError::NoArmsDefined { study_id }
        }
        RegistryError::Store { message } => RandomizationError::StorageUnavailable { message },
        // `resolve` emits only the variants above.
        other => RandomizationError::storage(other.to_string()),
    }
}

/// [`AssignmentLedger`] over the audit recorder, stamping timestamps from
/// the injected clock.
pub struct RecorderLedger<S, C>
where
    S: AssignmentStore,
    C: Clock,
{
    recorder: Arc<AuditRecorder<S>>,
    clock: C,
}

impl<S, C> RecorderLedger<S, C>
where
    S: AssignmentStore,
    C: Clock,
{
    pub fn new(recorder: Arc<AuditRecorder<S>>, clock: C) -> Self {
        Self { recorder, clock }
    }
}

impl<S, C> AssignmentLedger for RecorderLedger<S, C>
where
    S: AssignmentStore,
    C: Clock,
{
    fn site_history(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, RandomizationError> {
        self.recorder.site_history(site_id).map_err(ledger_error)
    }

    fn record(
        &self,
        decision: &AssignmentDecision,
    ) -> Result<AssignmentRecord, RandomizationError> {
        self.recorder
            .record(
                decision.patient_id,
                &decision.arm.name,
                decision.stratification_values.clone(),
                decision.site_id,
                decision.recorded_by,
                self.clock.now(),
            )
            .map_err(ledger_error)
    }
}

fn ledger_error(err: LedgerError) -> RandomizationError {
    match err {
        LedgerError::Unavailable { message } => {
            RandomizationError::StorageUnavailable { message }
        }
    }
}
