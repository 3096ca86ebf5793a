//! Outbound ports: ledger access.

use crate::domain::{IdentityId, LedgerError, OrgId, RecordKey, RecordKind};

/// Ledger view handed to one invocation.
///
/// Carries the verified caller identity and organization next to the
/// key-value operations. Object safe so the workflow can take
/// `&dyn LedgerAccessor`.
pub trait LedgerAccessor {
    /// Read the value at `key`.
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put(&self, key: &RecordKey, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Every entry whose key lives in the namespace of `kind`, in key order.
    fn scan_prefix(&self, kind: RecordKind) -> Result<Vec<(RecordKey, Vec<u8>)>, LedgerError>;

    /// Identity of the invoking participant.
    fn caller_identity(&self) -> &IdentityId;

    /// Organization of the invoking participant.
    fn caller_org(&self) -> &OrgId;
}

/// Key-value backend with no notion of a caller.
pub trait LedgerStore: Send + Sync {
    /// Read the value at `key`.
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` at `key`.
    fn put(&self, key: &RecordKey, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Every entry in the namespace of `kind`, in key order.
    fn scan_prefix(&self, kind: RecordKind) -> Result<Vec<(RecordKey, Vec<u8>)>, LedgerError>;
}
