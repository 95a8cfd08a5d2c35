//! # Outbound Ports (Driven Ports)
//!
//! The append-only assignment store. A production adapter must back
//! `append` with an insert the database cannot turn into an update, carry
//! the configured timeout, and map driver failures to
//! `LedgerError::Unavailable`.

use shared_types::{AssignmentRecord, PatientId, SiteId};

use crate::domain::errors::LedgerError;

/// Persistence for assignment records.
///
/// Deliberately has no update or delete methods: records are permanent
/// audit facts.
pub trait AssignmentStore: Send + Sync {
    /// Appends a record, assigning its id. The id on `record` is ignored.
    fn append(&self, record: AssignmentRecord) -> Result<AssignmentRecord, LedgerError>;

    /// All records for a site, oldest first.
    fn for_site(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, LedgerError>;

    /// All records for a patient, oldest first.
    fn for_patient(&self, patient_id: PatientId) -> Result<Vec<AssignmentRecord>, LedgerError>;
}

impl<T: AssignmentStore + ?Sized> AssignmentStore for std::sync::Arc<T> {
    fn append(&self, record: AssignmentRecord) -> Result<AssignmentRecord, LedgerError> {
        (**self).append(record)
    }
    fn for_site(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, LedgerError> {
        (**self).for_site(site_id)
    }
    fn for_patient(&self, patient_id: PatientId) -> Result<Vec<AssignmentRecord>, LedgerError> {
        (**self).for_patient(patient_id)
    }
}
