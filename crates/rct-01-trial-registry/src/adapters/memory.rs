//! # In-Memory Store Adapters
//!
//! `parking_lot`-guarded map-backed implementations of every registry port.
//! Ids come from per-store sequences, mirroring database identity columns.
//! These adapters back unit and integration tests and small single-node
//! deployments; they never fail, so `StoreError` paths are exercised with
//! dedicated failing doubles in tests.

use parking_lot::RwLock;
use shared_types::{
    Patient, PatientId, PatientVariableValue, Site, SiteId, Study, StudyId, StudySiteLink,
    StudyVariable, TreatmentArm, User, UserId, VariableId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use subtle::ConstantTimeEq;

use crate::ports::{
    PatientStore, SiteStore, StoreError, StudyStore, UserDirectory, VariableStore,
};

fn next(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::Relaxed)
}

/// In-memory `StudyStore`.
#[derive(Default)]
pub struct InMemoryStudyStore {
    studies: RwLock<HashMap<StudyId, Study>>,
    arms: RwLock<HashMap<ArmKey, TreatmentArm>>,
    links: RwLock<Vec<StudySiteLink>>,
    study_seq: AtomicU64,
    arm_seq: AtomicU64,
}

type ArmKey = (StudyId, u64);

impl InMemoryStudyStore {
    pub fn new() -> Self {
        Self {
            study_seq: AtomicU64::new(1),
            arm_seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

impl StudyStore for InMemoryStudyStore {
    fn insert_study(&self, mut study: Study) -> Result<Study, StoreError> {
        study.id = StudyId(next(&self.study_seq));
        self.studies.write().insert(study.id, study.clone());
        Ok(study)
    }

    fn study(&self, id: StudyId) -> Result<Option<Study>, StoreError> {
        Ok(self.studies.read().get(&id).cloned())
    }

    fn update_study(&self, study: Study) -> Result<(), StoreError> {
        self.studies.write().insert(study.id, study);
        Ok(())
    }

    fn studies(&self) -> Result<Vec<Study>, StoreError> {
        let mut all: Vec<Study> = self.studies.read().values().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    fn delete_study(&self, id: StudyId) -> Result<(), StoreError> {
        self.studies.write().remove(&id);
        self.arms.write().retain(|(study_id, _), _| *study_id != id);
        self.links.write().retain(|link| link.study_id != id);
        Ok(())
    }

    fn insert_arm(&self, mut arm: TreatmentArm) -> Result<TreatmentArm, StoreError> {
        let seq = next(&self.arm_seq);
        arm.id = shared_types::ArmId(seq);
        self.arms.write().insert((arm.study_id, seq), arm.clone());
        Ok(arm)
    }

    fn arms_for_study(&self, id: StudyId) -> Result<Vec<TreatmentArm>, StoreError> {
        let mut arms: Vec<TreatmentArm> = self
            .arms
            .read()
            .values()
            .filter(|arm| arm.study_id == id)
            .cloned()
            .collect();
        arms.sort_by_key(|arm| arm.id);
        Ok(arms)
    }

    fn insert_link(&self, link: StudySiteLink) -> Result<(), StoreError> {
        self.links.write().push(link);
        Ok(())
    }

    fn link_exists(&self, study_id: StudyId, site_id: SiteId) -> Result<bool, StoreError> {
        Ok(self
            .links
            .read()
            .iter()
            .any(|link| link.study_id == study_id && link.site_id == site_id))
    }

    fn site_linked(&self, site_id: SiteId) -> Result<bool, StoreError> {
        Ok(self.links.read().iter().any(|link| link.site_id == site_id))
    }
}

/// In-memory `SiteStore`.
#[derive(Default)]
pub struct InMemorySiteStore {
    sites: RwLock<HashMap<SiteId, Site>>,
    seq: AtomicU64,
}

impl InMemorySiteStore {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

impl SiteStore for InMemorySiteStore {
    fn insert_site(&self, mut site: Site) -> Result<Site, StoreError> {
        site.id = SiteId(next(&self.seq));
        self.sites.write().insert(site.id, site.clone());
        Ok(site)
    }

    fn site(&self, id: SiteId) -> Result<Option<Site>, StoreError> {
        Ok(self.sites.read().get(&id).cloned())
    }

    fn site_by_name(&self, name: &str) -> Result<Option<Site>, StoreError> {
        Ok(self
            .sites
            .read()
            .values()
            .find(|site| site.name == name)
            .cloned())
    }

    fn sites(&self) -> Result<Vec<Site>, StoreError> {
        let mut all: Vec<Site> = self.sites.read().values().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    fn update_site(&self, site: Site) -> Result<(), StoreError> {
        self.sites.write().insert(site.id, site);
        Ok(())
    }

    fn delete_site(&self, id: SiteId) -> Result<(), StoreError> {
        self.sites.write().remove(&id);
        Ok(())
    }
}

/// In-memory `VariableStore`.
#[derive(Default)]
pub struct InMemoryVariableStore {
    variables: RwLock<HashMap<VariableId, StudyVariable>>,
    seq: AtomicU64,
}

impl InMemoryVariableStore {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

impl VariableStore for InMemoryVariableStore {
    fn insert_variable(&self, mut variable: StudyVariable) -> Result<StudyVariable, StoreError> {
        variable.id = VariableId(next(&self.seq));
        self.variables.write().insert(variable.id, variable.clone());
        Ok(variable)
    }

    fn variable(&self, id: VariableId) -> Result<Option<StudyVariable>, StoreError> {
        Ok(self.variables.read().get(&id).cloned())
    }

    fn variables_for_study(&self, id: StudyId) -> Result<Vec<StudyVariable>, StoreError> {
        let mut vars: Vec<StudyVariable> = self
            .variables
            .read()
            .values()
            .filter(|v| v.study_id == id)
            .cloned()
            .collect();
        vars.sort_by_key(|v| v.id);
        Ok(vars)
    }
}

/// In-memory `PatientStore`.
#[derive(Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<HashMap<PatientId, Patient>>,
    values: RwLock<Vec<PatientVariableValue>>,
    seq: AtomicU64,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

impl PatientStore for InMemoryPatientStore {
    fn insert_patient(
        &self,
        mut patient: Patient,
        values: Vec<PatientVariableValue>,
    ) -> Result<Patient, StoreError> {
        patient.id = PatientId(next(&self.seq));
        self.patients.write().insert(patient.id, patient.clone());
        let mut stored = self.values.write();
        for mut value in values {
            value.patient_id = patient.id;
            stored.push(value);
        }
        Ok(patient)
    }

    fn patient(&self, id: PatientId) -> Result<Option<Patient>, StoreError> {
        Ok(self.patients.read().get(&id).cloned())
    }

    fn values_for_patient(&self, id: PatientId) -> Result<Vec<PatientVariableValue>, StoreError> {
        Ok(self
            .values
            .read()
            .iter()
            .filter(|value| value.patient_id == id)
            .cloned()
            .collect())
    }

    fn patients_for_study(&self, id: StudyId) -> Result<Vec<Patient>, StoreError> {
        let mut patients: Vec<Patient> = self
            .patients
            .read()
            .values()
            .filter(|p| p.study_id == Some(id))
            .cloned()
            .collect();
        patients.sort_by_key(|p| p.id);
        Ok(patients)
    }
}

/// In-memory `UserDirectory`.
///
/// Stores secrets verbatim and compares them in constant time. A production
/// directory verifies against the deployment's hash scheme instead.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, (User, String)>>,
    seq: AtomicU64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
            ..Self::default()
        }
    }
}

/// Constant-time string comparison.
///
/// Takes the same time regardless of how many characters match, so a caller
/// probing the login endpoint learns nothing from response timing. Both
/// inputs are padded to the longer length with differing fill bytes, and
/// length equality is folded into the comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

impl UserDirectory for InMemoryUserDirectory {
    fn insert_user(&self, mut user: User, secret: &str) -> Result<User, StoreError> {
        user.id = UserId(next(&self.seq));
        self.users
            .write()
            .insert(user.id, (user.clone(), secret.to_string()));
        Ok(user)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(&id).map(|(user, _)| user.clone()))
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|(user, _)| user.username == username)
            .map(|(user, _)| user.clone()))
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        let mut all: Vec<User> = self
            .users
            .read()
            .values()
            .map(|(user, _)| user.clone())
            .collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    fn verify_credentials(&self, username: &str, secret: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read();
        let found = users
            .values()
            .find(|(user, _)| user.username == username)
            .and_then(|(user, stored)| constant_time_eq(stored, secret).then(|| user.clone()));
        Ok(found)
    }

    fn set_secret(&self, id: UserId, secret: &str) -> Result<(), StoreError> {
        if let Some(entry) = self.users.write().get_mut(&id) {
            entry.1 = secret.to_string();
        }
        Ok(())
    }
}
