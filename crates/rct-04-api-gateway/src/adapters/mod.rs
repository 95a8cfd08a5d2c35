//! Adapters plugging the registry and ledger services into the
//! randomization subsystem's outbound ports.

pub mod randomization;

pub use randomization::{RecorderLedger, RegistryResolver};
