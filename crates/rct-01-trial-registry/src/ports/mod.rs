//! Port traits required by the registry services.

pub mod outbound;

pub use outbound::{
    Clock, PatientStore, SiteStore, StoreError, StudyStore, SystemClock, UserDirectory,
    VariableStore,
};
