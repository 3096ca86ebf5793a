//! # Domain Module
//!
//! Core domain types for the record workflow: records, storage keys,
//! capabilities, policies, errors and invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod keys;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use keys::*;
pub use value_objects::*;
