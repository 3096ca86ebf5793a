//! # Lifecycle
//!
//! Typed requests parsed from positional arguments, and the manager that
//! creates, validates, queries and lists records.

pub mod manager;
pub mod requests;

pub use manager::LifecycleManager;
pub use requests::*;
