//! # Ports
//!
//! Inbound: [`RecordWorkflowApi`], the invocation surface.
//! Outbound: [`LedgerAccessor`] (per-invocation ledger view with caller
//! context) and [`LedgerStore`] (raw key-value backend).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
