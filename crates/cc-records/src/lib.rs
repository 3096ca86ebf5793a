//! # CC-Records - Academic Record Workflow Engine
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Participants submit identity-linked records (student enrollment, course
//! grades, prizes) into a shared key-value ledger. Who may write what, and
//! what is visible to whom, is decided by capabilities computed per
//! invocation from the ledger itself rather than by a static access list.
//! Every record moves through a three-state approval workflow.
//!
//! ## Capabilities
//!
//! | Capability | Held when |
//! |------------|-----------|
//! | `All` | always |
//! | `Validator` | caller organization equals the configured validator organization |
//! | `Student(school, id)` | the student record at `(school, id)` is owned by the caller and `Approved` |
//!
//! ## Record Lifecycle
//!
//! ```text
//!   create ──→ Pending ──validate──→ Approved
//!                 │
//!                 └─────validate──→ Rejected
//! ```
//!
//! Under the default strict policy both terminal states are final. The
//! permissive policy lets a validator move a record between any states.
//!
//! ## Invocation Flow
//!
//! ```text
//! Dispatcher ──lookup/arity/parse──→ RecordService
//!                                       │
//!                                       ├── RoleResolver (reads ledger)
//!                                       └── LifecycleManager (reads/writes ledger)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! cc-records/
//! ├── domain/      # records, keys, value objects, errors, invariants
//! ├── ports/       # RecordWorkflowApi, LedgerAccessor, LedgerStore
//! ├── adapters/    # in-memory ledger, file ledger, invocation stub
//! ├── roles/       # capability resolution
//! ├── lifecycle/   # create / validate / query / list
//! └── dispatch/    # invocation table and dispatcher
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod lifecycle;
pub mod ports;
pub mod roles;
pub mod service;

// Re-exports
pub use adapters::{FileLedger, InMemoryLedger, InvocationStub};
pub use config::{ConfigError, WorkflowConfig};
pub use dispatch::{
    lookup, Command, DispatchStats, Dispatcher, InvocationSpec, OperationKind, INVOCATION_TABLE,
};
pub use domain::{
    grade_key, prize_key, student_key, Capability, DuplicatePolicy, ErrorKind, GradeRecord,
    IdentityId, LedgerError, LedgerRecord, NewGrade, NewPrize, NewStudent, OrgId,
    PermissionDenied, PrizeRecord, QueryDisclosure, RecordError, RecordKey, RecordKind,
    RecordResult, RecordStatus, StudentRecord, StudentRef, TransitionPolicy, ValidationError,
};
pub use lifecycle::{GradeLocator, LifecycleManager, PrizeLocator, StatusChange, StudentLocator};
pub use ports::{LedgerAccessor, LedgerStore, RecordWorkflowApi, Response};
pub use roles::RoleResolver;
pub use service::RecordService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
