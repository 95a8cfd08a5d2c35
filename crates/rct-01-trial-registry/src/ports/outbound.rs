//! # Outbound Ports (Driven Ports)
//!
//! Store interfaces the registry services depend on. The in-memory adapters
//! in this crate back every trait; a relational adapter belongs to the host
//! application and must provide the same semantics (notably: id assignment
//! on insert, and cascade removal of arms and site links with their study).
//!
//! Insert methods take a fully-populated entity whose id field is ignored;
//! the store assigns the id and returns the stored entity.

use chrono::{DateTime, Utc};
use shared_types::{
    Patient, PatientId, PatientVariableValue, Site, SiteId, Study, StudyId, StudySiteLink,
    StudyVariable, TreatmentArm, User, UserId, VariableId,
};
use std::fmt;

/// Store-level failure. A production adapter maps driver errors and timeouts
/// here; callers surface it as storage unavailability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store failed or timed out.
    Unavailable { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable { message } => write!(f, "store unavailable: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence for studies, their arms, and their site links.
pub trait StudyStore: Send + Sync {
    fn insert_study(&self, study: Study) -> Result<Study, StoreError>;

    fn study(&self, id: StudyId) -> Result<Option<Study>, StoreError>;

    /// Replaces the stored study with the same id.
    fn update_study(&self, study: Study) -> Result<(), StoreError>;

    fn studies(&self) -> Result<Vec<Study>, StoreError>;

    /// Removes the study together with its arms and site links.
    fn delete_study(&self, id: StudyId) -> Result<(), StoreError>;

    fn insert_arm(&self, arm: TreatmentArm) -> Result<TreatmentArm, StoreError>;

    fn arms_for_study(&self, id: StudyId) -> Result<Vec<TreatmentArm>, StoreError>;

    fn insert_link(&self, link: StudySiteLink) -> Result<(), StoreError>;

    fn link_exists(&self, study_id: StudyId, site_id: SiteId) -> Result<bool, StoreError>;

    /// Whether any study links to this site.
    fn site_linked(&self, site_id: SiteId) -> Result<bool, StoreError>;
}

/// Persistence for clinical sites.
pub trait SiteStore: Send + Sync {
    fn insert_site(&self, site: Site) -> Result<Site, StoreError>;

    fn site(&self, id: SiteId) -> Result<Option<Site>, StoreError>;

    fn site_by_name(&self, name: &str) -> Result<Option<Site>, StoreError>;

    fn sites(&self) -> Result<Vec<Site>, StoreError>;

    fn update_site(&self, site: Site) -> Result<(), StoreError>;

    fn delete_site(&self, id: SiteId) -> Result<(), StoreError>;
}

/// Persistence for per-study data-collection variables.
pub trait VariableStore: Send + Sync {
    fn insert_variable(&self, variable: StudyVariable) -> Result<StudyVariable, StoreError>;

    fn variable(&self, id: VariableId) -> Result<Option<StudyVariable>, StoreError>;

    fn variables_for_study(&self, id: StudyId) -> Result<Vec<StudyVariable>, StoreError>;
}

/// Persistence for patients and their captured variable values.
pub trait PatientStore: Send + Sync {
    /// Inserts the patient and their variable values in one step. The store
    /// rewrites each value's `patient_id` to the assigned id.
    fn insert_patient(
        &self,
        patient: Patient,
        values: Vec<PatientVariableValue>,
    ) -> Result<Patient, StoreError>;

    fn patient(&self, id: PatientId) -> Result<Option<Patient>, StoreError>;

    fn values_for_patient(&self, id: PatientId) -> Result<Vec<PatientVariableValue>, StoreError>;

    fn patients_for_study(&self, id: StudyId) -> Result<Vec<Patient>, StoreError>;
}

/// Identity resolution and credential verification.
///
/// Credential storage is entirely the adapter's concern; the in-memory
/// adapter compares secrets in constant time, a production adapter verifies
/// against whatever hash scheme the deployment uses.
pub trait UserDirectory: Send + Sync {
    fn insert_user(&self, user: User, secret: &str) -> Result<User, StoreError>;

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Returns the user when the username exists and the secret matches.
    fn verify_credentials(&self, username: &str, secret: &str) -> Result<Option<User>, StoreError>;

    fn set_secret(&self, id: UserId, secret: &str) -> Result<(), StoreError>;
}

/// Abstract time source, for testability.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// Stores are shared between services (the registry and enrollment services
// read the same studies), so every port is usable through an Arc.

impl<T: StudyStore + ?Sized> StudyStore for std::sync::Arc<T> {
    fn insert_study(&self, study: Study) -> Result<Study, StoreError> {
        (**self).insert_study(study)
    }
    fn study(&self, id: StudyId) -> Result<Option<Study>, StoreError> {
        (**self).study(id)
    }
    fn update_study(&self, study: Study) -> Result<(), StoreError> {
        (**self).update_study(study)
    }
    fn studies(&self) -> Result<Vec<Study>, StoreError> {
        (**self).studies()
    }
    fn delete_study(&self, id: StudyId) -> Result<(), StoreError> {
        (**self).delete_study(id)
    }
    fn insert_arm(&self, arm: TreatmentArm) -> Result<TreatmentArm, StoreError> {
        (**self).insert_arm(arm)
    }
    fn arms_for_study(&self, id: StudyId) -> Result<Vec<TreatmentArm>, StoreError> {
        (**self).arms_for_study(id)
    }
    fn insert_link(&self, link: StudySiteLink) -> Result<(), StoreError> {
        (**self).insert_link(link)
    }
    fn link_exists(&self, study_id: StudyId, site_id: SiteId) -> Result<bool, StoreError> {
        (**self).link_exists(study_id, site_id)
    }
    fn site_linked(&self, site_id: SiteId) -> Result<bool, StoreError> {
        (**self).site_linked(site_id)
    }
}

impl<T: SiteStore + ?Sized> SiteStore for std::sync::Arc<T> {
    fn insert_site(&self, site: Site) -> Result<Site, StoreError> {
        (**self).insert_site(site)
    }
    fn site(&self, id: SiteId) -> Result<Option<Site>, StoreError> {
        (**self).site(id)
    }
    fn site_by_name(&self, name: &str) -> Result<Option<Site>, StoreError> {
        (**self).site_by_name(name)
    }
    fn sites(&self) -> Result<Vec<Site>, StoreError> {
        (**self).sites()
    }
    fn update_site(&self, site: Site) -> Result<(), StoreError> {
        (**self).update_site(site)
    }
    fn delete_site(&self, id: SiteId) -> Result<(), StoreError> {
        (**self).delete_site(id)
    }
}

impl<T: VariableStore + ?Sized> VariableStore for std::sync::Arc<T> {
    fn insert_variable(&self, variable: StudyVariable) -> Result<StudyVariable, StoreError> {
        (**self).insert_variable(variable)
    }
    fn variable(&self, id: VariableId) -> Result<Option<StudyVariable>, StoreError> {
        (**self).variable(id)
    }
    fn variables_for_study(&self, id: StudyId) -> Result<Vec<StudyVariable>, StoreError> {
        (**self).variables_for_study(id)
    }
}

impl<T: PatientStore + ?Sized> PatientStore for std::sync::Arc<T> {
    fn insert_patient(
        &self,
        patient: Patient,
        values: Vec<PatientVariableValue>,
    ) -> Result<Patient, StoreError> {
        (**self).insert_patient(patient, values)
    }
    fn patient(&self, id: PatientId) -> Result<Option<Patient>, StoreError> {
        (**self).patient(id)
    }
    fn values_for_patient(&self, id: PatientId) -> Result<Vec<PatientVariableValue>, StoreError> {
        (**self).values_for_patient(id)
    }
    fn patients_for_study(&self, id: StudyId) -> Result<Vec<Patient>, StoreError> {
        (**self).patients_for_study(id)
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<T> {
    fn insert_user(&self, user: User, secret: &str) -> Result<User, StoreError> {
        (**self).insert_user(user, secret)
    }
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).user(id)
    }
    fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        (**self).user_by_username(username)
    }
    fn users(&self) -> Result<Vec<User>, StoreError> {
        (**self).users()
    }
    fn verify_credentials(&self, username: &str, secret: &str) -> Result<Option<User>, StoreError> {
        (**self).verify_credentials(username, secret)
    }
    fn set_secret(&self, id: UserId, secret: &str) -> Result<(), StoreError> {
        (**self).set_secret(id, secret)
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Default clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
