//! # Roles
//!
//! Per-invocation capability resolution. Read-only against the ledger.

pub mod resolver;

pub use resolver::RoleResolver;
