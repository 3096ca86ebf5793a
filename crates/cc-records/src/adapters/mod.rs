//! # Adapters
//!
//! Ledger backends and the per-invocation stub that binds a backend to a
//! caller.

pub mod file_ledger;
pub mod memory_ledger;
pub mod stub;

pub use file_ledger::FileLedger;
pub use memory_ledger::InMemoryLedger;
pub use stub::InvocationStub;
