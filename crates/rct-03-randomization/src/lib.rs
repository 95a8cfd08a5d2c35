//! # Randomization Engine (rct-03)
//!
//! Assigns incoming patients to treatment arms according to the study's
//! configured strategy, and orchestrates the surrounding flow: resolve the
//! study, serialize cluster decisions per site, record the audit fact.
//!
//! ## Architecture
//!
//! ```text
//! caller ──→ RandomizationService::randomize
//!                │
//!                ├─ StudyResolver::resolve ──→ (config, arms)
//!                ├─ [cluster] per-site lock + AssignmentLedger::site_history
//!                ├─ engine::assign (pure, injected RNG)
//!                └─ AssignmentLedger::record ──→ AssignmentRecord
//! ```
//!
//! The engine itself ([`domain::engine::assign`]) is a pure function over
//! its inputs: no storage handles, no global RNG, no shared mutable state.
//! Everything it needs — including the generator — is passed in, so tests
//! drive it deterministically with a seeded `StdRng`.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | One arm or an error | `assign` never returns an empty choice; when no arm resolves it fails with `AssignmentFailed` |
//! | Site stickiness | Under the cluster strategy, a site's first recorded arm is reused by every later assignment at that site |
//! | First writer wins | Concurrent first assignments for a new site are serialized; exactly one arm becomes permanent |
//! | No silent defaults | Misconfiguration (unknown strategy, no arms) surfaces as a structured error, never an arbitrary arm |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::engine;
pub use domain::errors::RandomizationError;
pub use ports::{AssignmentDecision, AssignmentLedger, StudyResolver};
pub use service::{RandomizationService, RandomizeOutcome, RandomizeRequest};
