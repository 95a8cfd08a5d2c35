//! # Audit Recorder
//!
//! Persists randomization decisions as immutable events.

use chrono::{DateTime, Utc};
use shared_types::{AssignmentRecord, PatientId, RecordId, SiteId, StratificationValues, UserId};
use tracing::info;

use crate::domain::errors::LedgerError;
use crate::ports::AssignmentStore;

/// The audit recorder service.
///
/// Thin by design: it stamps nothing itself (the caller supplies the
/// decision timestamp) and never touches an existing record.
pub struct AuditRecorder<S>
where
    S: AssignmentStore,
{
    store: S,
}

impl<S> AuditRecorder<S>
where
    S: AssignmentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a randomization decision.
    ///
    /// ## Errors
    ///
    /// - `Unavailable`: the underlying store failed or timed out. No other
    ///   failure mode exists; a successful decision is always recordable.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        patient_id: PatientId,
        arm_name: &str,
        stratification_values: StratificationValues,
        site_id: Option<SiteId>,
        recorded_by: UserId,
        assigned_at: DateTime<Utc>,
    ) -> Result<AssignmentRecord, LedgerError> {
        let record = self.store.append(AssignmentRecord {
            id: RecordId(0),
            patient_id,
            arm_name: arm_name.to_string(),
            assigned_at,
            stratification_values,
            recorded_by,
            site_id,
        })?;

        info!(
            record_id = %record.id,
            patient_id = %record.patient_id,
            arm = %record.arm_name,
            site_id = ?record.site_id,
            "assignment recorded"
        );
        Ok(record)
    }

    /// Assignment history for a site, oldest first.
    pub fn site_history(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, LedgerError> {
        self.store.for_site(site_id)
    }

    /// Assignment history for a patient, oldest first.
    pub fn patient_history(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<AssignmentRecord>, LedgerError> {
        self.store.for_patient(patient_id)
    }
}
