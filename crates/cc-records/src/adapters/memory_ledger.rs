//! In-memory ledger backend.
//!
//! Also the test double for the workflow: writes can be made to fail and
//! every access is counted.

use crate::adapters::InvocationStub;
use crate::domain::{IdentityId, LedgerError, OrgId, RecordKey, RecordKind};
use crate::ports::LedgerStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory ledger, ordered by key.
///
/// Writes can be made to fail on demand to exercise persistence errors.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<BTreeMap<RecordKey, Vec<u8>>>,
    fail_writes: AtomicBool,
    accesses: AtomicUsize,
}

impl InMemoryLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with `entries`.
    pub fn with_entries(entries: BTreeMap<RecordKey, Vec<u8>>) -> Self {
        Self {
            entries: RwLock::new(entries),
            ..Self::default()
        }
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of get/put/scan calls served so far.
    pub fn access_count(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    /// Copy of every entry.
    pub fn snapshot(&self) -> BTreeMap<RecordKey, Vec<u8>> {
        self.entries.read().clone()
    }

    /// Bind this ledger to a caller for one invocation.
    pub fn stub(
        &self,
        identity: impl Into<String>,
        org: impl Into<String>,
    ) -> InvocationStub<'_, Self> {
        InvocationStub::new(self, IdentityId::new(identity), OrgId::new(org))
    }

    fn touch(&self) {
        self.accesses.fetch_add(1, Ordering::SeqCst);
    }
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>, LedgerError> {
        self.touch();
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &RecordKey, value: Vec<u8>) -> Result<(), LedgerError> {
        self.touch();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteFailed(format!("write to {key} refused")));
        }
        self.entries.write().insert(key.clone(), value);
        Ok(())
    }

    fn scan_prefix(&self, kind: RecordKind) -> Result<Vec<(RecordKey, Vec<u8>)>, LedgerError> {
        self.touch();
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|(key, _)| key.is_kind(kind))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{prize_key, student_key};

    #[test]
    fn test_put_get() {
        let ledger = InMemoryLedger::new();
        let key = student_key("MIT", 1);
        assert_eq!(ledger.get(&key).unwrap(), None);
        ledger.put(&key, b"x".to_vec()).unwrap();
        assert_eq!(ledger.get(&key).unwrap(), Some(b"x".to_vec()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_fail_writes() {
        let ledger = InMemoryLedger::new();
        ledger.set_fail_writes(true);
        let err = ledger.put(&student_key("MIT", 1), vec![]).unwrap_err();
        assert!(matches!(err, LedgerError::WriteFailed(_)));
        assert!(ledger.is_empty());

        ledger.set_fail_writes(false);
        ledger.put(&student_key("MIT", 1), vec![]).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_scan_prefix_stays_in_namespace() {
        let ledger = InMemoryLedger::new();
        ledger.put(&student_key("MIT", 2), b"s2".to_vec()).unwrap();
        ledger.put(&student_key("MIT", 1), b"s1".to_vec()).unwrap();
        ledger.put(&prize_key("P1"), b"p".to_vec()).unwrap();

        let students = ledger.scan_prefix(RecordKind::Student).unwrap();
        assert_eq!(students.len(), 2);
        assert!(students.iter().all(|(k, _)| k.is_kind(RecordKind::Student)));
        assert!(ledger.scan_prefix(RecordKind::Grade).unwrap().is_empty());
    }

    #[test]
    fn test_access_count() {
        let ledger = InMemoryLedger::new();
        let _ = ledger.get(&prize_key("P1"));
        let _ = ledger.scan_prefix(RecordKind::Prize);
        assert_eq!(ledger.access_count(), 2);
    }
}
