//! Adapter implementations of the registry ports.
//!
//! Only the in-memory adapters live here; a relational adapter is wired by
//! the host application.

pub mod memory;

pub use memory::{
    InMemoryPatientStore, InMemorySiteStore, InMemoryStudyStore, InMemoryUserDirectory,
    InMemoryVariableStore,
};
