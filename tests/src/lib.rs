//! # RCT-Manager Test Suite
//!
//! Unified test crate covering behavior that spans subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── engine_statistics.rs  # Selection-frequency convergence per strategy
//! ├── cluster_flow.rs       # Registry → engine → ledger, full stack
//! ├── registry_flows.rs     # CRUD, policy, and ownership flows
//! └── gateway_api.rs        # In-process HTTP: auth, status codes, payloads
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rct-tests
//!
//! # By module
//! cargo test -p rct-tests integration::engine_statistics
//! cargo test -p rct-tests integration::gateway_api
//! ```

pub mod integration;
