//! Per-invocation binding of a ledger backend to its caller.

use crate::domain::{IdentityId, LedgerError, OrgId, RecordKey, RecordKind};
use crate::ports::{LedgerAccessor, LedgerStore};

/// A ledger backend bound to the verified caller of one invocation.
#[derive(Debug)]
pub struct InvocationStub<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    identity: IdentityId,
    org: OrgId,
}

impl<'a, S: LedgerStore + ?Sized> InvocationStub<'a, S> {
    /// Bind `store` to the caller `identity` of `org`.
    pub fn new(store: &'a S, identity: IdentityId, org: OrgId) -> Self {
        Self {
            store,
            identity,
            org,
        }
    }
}

impl<S: LedgerStore + ?Sized> LedgerAccessor for InvocationStub<'_, S> {
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>, LedgerError> {
        self.store.get(key)
    }

    fn put(&self, key: &RecordKey, value: Vec<u8>) -> Result<(), LedgerError> {
        self.store.put(key, value)
    }

    fn scan_prefix(&self, kind: RecordKind) -> Result<Vec<(RecordKey, Vec<u8>)>, LedgerError> {
        self.store.scan_prefix(kind)
    }

    fn caller_identity(&self) -> &IdentityId {
        &self.identity
    }

    fn caller_org(&self) -> &OrgId {
        &self.org
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::student_key;

    #[test]
    fn test_stub_carries_caller_and_shares_store() {
        let ledger = InMemoryLedger::new();
        let alice = ledger.stub("alice", "Org2MSP");
        assert_eq!(alice.caller_identity().as_str(), "alice");
        assert_eq!(alice.caller_org().as_str(), "Org2MSP");

        alice.put(&student_key("MIT", 1), b"v".to_vec()).unwrap();
        let bob = ledger.stub("bob", "Org1MSP");
        assert_eq!(bob.get(&student_key("MIT", 1)).unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_stub_over_trait_object() {
        let ledger = InMemoryLedger::new();
        let store: &dyn LedgerStore = &ledger;
        let stub = InvocationStub::new(store, IdentityId::new("u"), OrgId::new("o"));
        assert!(stub.scan_prefix(RecordKind::Student).unwrap().is_empty());
    }
}
