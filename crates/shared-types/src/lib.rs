//! # Shared Types Crate
//!
//! This crate contains all cross-subsystem domain entities for RCT-Manager,
//! plus the closed role and authorization-policy model.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every entity that crosses a crate boundary
//!   (studies, arms, assignment records, patients, users) is defined here.
//! - **Closed role model**: roles and operations are enums; there are no
//!   free-form role strings anywhere in the system.
//! - **Immutable audit facts**: `AssignmentRecord` carries no mutators and no
//!   subsystem exposes an update or delete path for it.

pub mod entities;
pub mod roles;

pub use entities::*;
pub use roles::*;
