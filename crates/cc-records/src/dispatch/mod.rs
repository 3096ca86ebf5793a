//! # Dispatch
//!
//! Declarative invocation table and the dispatcher that applies it:
//! name lookup, arity check, argument parsing, then capability resolution
//! and the handler inside [`RecordService`](crate::service::RecordService).

pub mod command;
pub mod dispatcher;
pub mod table;

pub use command::{Command, OperationKind};
pub use dispatcher::{DispatchStats, Dispatcher};
pub use table::{lookup, InvocationSpec, INVOCATION_TABLE};
