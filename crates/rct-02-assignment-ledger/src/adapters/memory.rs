//! # In-Memory Assignment Store
//!
//! Vec-backed append-only store. Records keep insertion order, so
//! "first record for a site" is well-defined without a timestamp sort.

use parking_lot::RwLock;
use shared_types::{AssignmentRecord, PatientId, RecordId, SiteId};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::errors::LedgerError;
use crate::ports::AssignmentStore;

#[derive(Default)]
pub struct InMemoryAssignmentStore {
    records: RwLock<Vec<AssignmentRecord>>,
    seq: AtomicU64,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            seq: AtomicU64::new(1),
        }
    }

    /// Total number of records, for audit summaries and tests.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn append(&self, mut record: AssignmentRecord) -> Result<AssignmentRecord, LedgerError> {
        record.id = RecordId(self.seq.fetch_add(1, Ordering::Relaxed));
        self.records.write().push(record.clone());
        Ok(record)
    }

    fn for_site(&self, site_id: SiteId) -> Result<Vec<AssignmentRecord>, LedgerError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| record.site_id == Some(site_id))
            .cloned()
            .collect())
    }

    fn for_patient(&self, patient_id: PatientId) -> Result<Vec<AssignmentRecord>, LedgerError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| record.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
