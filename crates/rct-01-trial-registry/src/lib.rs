//! # Trial Registry (rct-01)
//!
//! The Trial Registry is the system of record for trial setup and
//! enrollment: studies with their treatment arms, sites, per-study
//! data-collection variables, patients, and user accounts.
//!
//! Its one contract consumed by the randomization subsystem is
//! [`RegistryService::resolve`]: a side-effect-free read of a study's
//! randomization configuration and arm list, refusing studies that are
//! missing, not flagged for randomization, or armless.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - errors and request/response payloads
//! - `ports/` - driven-port traits (stores, clock)
//! - `adapters/` - in-memory adapters; a relational adapter is the host
//!   application's concern
//! - `service.rs` - application services enforcing policy and ownership

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    InMemoryPatientStore, InMemorySiteStore, InMemoryStudyStore, InMemoryUserDirectory,
    InMemoryVariableStore,
};
pub use domain::errors::RegistryError;
pub use domain::payloads::*;
pub use ports::{
    Clock, PatientStore, SiteStore, StoreError, StudyStore, SystemClock, UserDirectory,
    VariableStore,
};
pub use service::{PatientService, RegistryService, UserService};
