//! Record lifecycle operations.

use crate::config::WorkflowConfig;
use crate::domain::{
    invariant_status_transition, invariant_visible, DuplicatePolicy, LedgerRecord,
    QueryDisclosure, RecordError, RecordKey, RecordResult, RecordStatus,
};
use crate::ports::LedgerAccessor;
use tracing::{debug, info, warn};

/// Create, validate, query and list operations, generic over the record kind.
///
/// Capability checks happen before any of these run; the manager enforces
/// state rules only.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleManager<'c> {
    config: &'c WorkflowConfig,
}

impl<'c> LifecycleManager<'c> {
    /// Manager applying the policies of `config`.
    pub fn new(config: &'c WorkflowConfig) -> Self {
        Self { config }
    }

    /// Store a freshly built `Pending` record and return its key.
    pub fn create<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
        record: R,
    ) -> RecordResult<RecordKey> {
        let key = record.key();
        if let Some(bytes) = ledger.get(&key)? {
            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(RecordError::Duplicate { kind: R::KIND, key });
                }
                // Previous bytes are only logged; undecodable ones are overwritten too.
                DuplicatePolicy::Overwrite => match R::decode(&key, &bytes).ok() {
                    Some(existing) => warn!(
                        kind = %R::KIND,
                        key = %key,
                        previous_owner = %existing.owner(),
                        previous_status = %existing.status(),
                        "Overwriting existing record"
                    ),
                    None => warn!(kind = %R::KIND, key = %key, "Overwriting undecodable record"),
                },
            }
        }

        self.store(ledger, &key, &record)?;
        info!(kind = %R::KIND, key = %key, owner = %record.owner(), "Record created");
        Ok(key)
    }

    /// Move the record at `key` to `target` and return the updated record.
    pub fn validate<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
        key: RecordKey,
        target: RecordStatus,
    ) -> RecordResult<R> {
        let Some(mut record) = self.load::<R>(ledger, &key)? else {
            return Err(RecordError::NotFound { kind: R::KIND, key });
        };

        let from = record.status();
        if !invariant_status_transition(self.config.transition_policy, from, target) {
            return Err(RecordError::InvalidTransition {
                kind: R::KIND,
                key,
                from,
                to: target,
            });
        }

        record.set_status(target);
        self.store(ledger, &key, &record)?;
        info!(kind = %R::KIND, key = %key, from = %from, to = %target, "Record status changed");
        Ok(record)
    }

    /// Read the record at `key` if it is approved.
    pub fn query<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
        key: RecordKey,
    ) -> RecordResult<R> {
        let Some(record) = self.load::<R>(ledger, &key)? else {
            debug!(kind = %R::KIND, key = %key, "Query miss");
            return Err(RecordError::NotFound { kind: R::KIND, key });
        };

        if !invariant_visible(record.status()) {
            debug!(
                kind = %R::KIND,
                key = %key,
                status = %record.status(),
                "Query hit non-approved record"
            );
            return Err(match self.config.query_errors {
                QueryDisclosure::Distinct => RecordError::NotApproved { kind: R::KIND, key },
                QueryDisclosure::Collapsed => RecordError::NotFound { kind: R::KIND, key },
            });
        }
        Ok(record)
    }

    /// Every `Pending` record of kind `R`, in key order.
    pub fn list_pending<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
    ) -> RecordResult<Vec<R>> {
        let mut pending = Vec::new();
        for (key, bytes) in ledger.scan_prefix(R::KIND)? {
            let record = R::decode(&key, &bytes)?;
            if record.status() == RecordStatus::Pending {
                pending.push(record);
            }
        }
        debug!(kind = %R::KIND, count = pending.len(), "Listed pending records");
        Ok(pending)
    }

    fn load<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
        key: &RecordKey,
    ) -> RecordResult<Option<R>> {
        ledger
            .get(key)?
            .map(|bytes| R::decode(key, &bytes))
            .transpose()
    }

    fn store<R: LedgerRecord>(
        &self,
        ledger: &dyn LedgerAccessor,
        key: &RecordKey,
        record: &R,
    ) -> RecordResult<()> {
        ledger.put(key, record.encode()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::{
        ErrorKind, IdentityId, NewPrize, NewStudent, PrizeRecord, StudentRecord, StudentRef,
        TransitionPolicy,
    };
    use crate::ports::LedgerStore;

    fn student(id: u64, owner: &str) -> StudentRecord {
        StudentRecord::pending(
            NewStudent {
                school: "MIT".into(),
                major: "CS".into(),
                id,
                name: "Alice".into(),
            },
            IdentityId::new(owner),
        )
    }

    #[test]
    fn test_create_stores_pending_with_owner() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);

        let key = manager.create(&ledger.stub("u1", "Org2MSP"), student(1, "u1")).unwrap();
        let stored: StudentRecord =
            serde_json::from_slice(&ledger.get(&key).unwrap().unwrap()).unwrap();
        assert_eq!(stored.status, RecordStatus::Pending);
        assert_eq!(stored.owner, IdentityId::new("u1"));
    }

    #[test]
    fn test_overwrite_resets_owner_and_status() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("v", "Org1MSP");

        let key = manager.create(&stub, student(1, "u1")).unwrap();
        manager
            .validate::<StudentRecord>(&stub, key.clone(), RecordStatus::Approved)
            .unwrap();
        manager.create(&stub, student(1, "u2")).unwrap();

        let stored: StudentRecord =
            serde_json::from_slice(&ledger.get(&key).unwrap().unwrap()).unwrap();
        assert_eq!(stored.owner, IdentityId::new("u2"));
        assert_eq!(stored.status, RecordStatus::Pending);
    }

    #[test]
    fn test_duplicate_reject() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig {
            duplicate_policy: DuplicatePolicy::Reject,
            ..WorkflowConfig::default()
        };
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("u1", "Org2MSP");

        manager.create(&stub, student(1, "u1")).unwrap();
        let err = manager.create(&stub, student(1, "u1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }

    #[test]
    fn test_validate_missing_is_not_found() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);
        let err = manager
            .validate::<PrizeRecord>(
                &ledger.stub("v", "Org1MSP"),
                crate::domain::prize_key("nope"),
                RecordStatus::Approved,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_strict_policy_blocks_retransition() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("v", "Org1MSP");

        let key = manager.create(&stub, student(1, "u1")).unwrap();
        manager
            .validate::<StudentRecord>(&stub, key.clone(), RecordStatus::Rejected)
            .unwrap();
        let err = manager
            .validate::<StudentRecord>(&stub, key, RecordStatus::Approved)
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidTransition {
                from: RecordStatus::Rejected,
                to: RecordStatus::Approved,
                ..
            }
        ));
    }

    #[test]
    fn test_permissive_policy_allows_retransition() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig {
            transition_policy: TransitionPolicy::Permissive,
            ..WorkflowConfig::default()
        };
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("v", "Org1MSP");

        let key = manager.create(&stub, student(1, "u1")).unwrap();
        manager
            .validate::<StudentRecord>(&stub, key.clone(), RecordStatus::Rejected)
            .unwrap();
        let record = manager
            .validate::<StudentRecord>(&stub, key, RecordStatus::Approved)
            .unwrap();
        assert_eq!(record.status, RecordStatus::Approved);
    }

    #[test]
    fn test_query_disclosure_modes() {
        let ledger = InMemoryLedger::new();
        let distinct = WorkflowConfig::default();
        let collapsed = WorkflowConfig {
            query_errors: QueryDisclosure::Collapsed,
            ..WorkflowConfig::default()
        };
        let stub = ledger.stub("u1", "Org2MSP");
        let key = LifecycleManager::new(&distinct)
            .create(&stub, student(1, "u1"))
            .unwrap();

        let err = LifecycleManager::new(&distinct)
            .query::<StudentRecord>(&stub, key.clone())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotApproved);

        let err = LifecycleManager::new(&collapsed)
            .query::<StudentRecord>(&stub, key)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_write_failure_is_persistence_and_leaves_state() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("v", "Org1MSP");
        let key = manager.create(&stub, student(1, "u1")).unwrap();
        let before = ledger.snapshot();

        ledger.set_fail_writes(true);
        let err = manager
            .validate::<StudentRecord>(&stub, key, RecordStatus::Approved)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_corrupt_bytes() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let key = crate::domain::student_key("MIT", 1);
        ledger.put(&key, b"garbage".to_vec()).unwrap();
        let err = LifecycleManager::new(&config)
            .query::<StudentRecord>(&ledger.stub("u", "o"), key)
            .unwrap_err();
        assert!(matches!(err, RecordError::Corrupt { .. }));
    }

    #[test]
    fn test_create_over_undecodable_bytes() {
        let ledger = InMemoryLedger::new();
        let key = crate::domain::student_key("MIT", 1);
        ledger.put(&key, b"legacy-garbage".to_vec()).unwrap();
        let stub = ledger.stub("u1", "Org2MSP");

        let overwrite = WorkflowConfig::default();
        let stored = LifecycleManager::new(&overwrite)
            .create(&stub, student(1, "u1"))
            .unwrap();
        assert_eq!(stored, key);
        let record: StudentRecord =
            serde_json::from_slice(&ledger.get(&key).unwrap().unwrap()).unwrap();
        assert_eq!(record.status, RecordStatus::Pending);

        ledger.put(&key, b"legacy-garbage".to_vec()).unwrap();
        let reject = WorkflowConfig {
            duplicate_policy: DuplicatePolicy::Reject,
            ..WorkflowConfig::default()
        };
        let err = LifecycleManager::new(&reject)
            .create(&stub, student(1, "u1"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
        assert_eq!(ledger.get(&key).unwrap().unwrap(), b"legacy-garbage".to_vec());
    }

    #[test]
    fn test_list_pending_filters_status_and_kind() {
        let ledger = InMemoryLedger::new();
        let config = WorkflowConfig::default();
        let manager = LifecycleManager::new(&config);
        let stub = ledger.stub("v", "Org1MSP");

        let approved = manager.create(&stub, student(1, "u1")).unwrap();
        manager.create(&stub, student(2, "u1")).unwrap();
        manager.create(&stub, student(3, "u2")).unwrap();
        manager
            .validate::<StudentRecord>(&stub, approved, RecordStatus::Approved)
            .unwrap();
        manager
            .create(
                &stub,
                PrizeRecord::pending(
                    NewPrize {
                        student: StudentRef::new("MIT", 1),
                        name: "Putnam".into(),
                        id: "P-1".into(),
                        year: 2024,
                        level: "national".into(),
                        institution: "MAA".into(),
                    },
                    IdentityId::new("u1"),
                ),
            )
            .unwrap();

        let pending = manager.list_pending::<StudentRecord>(&stub).unwrap();
        let ids: Vec<u64> = pending.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(manager.list_pending::<PrizeRecord>(&stub).unwrap().len(), 1);
    }
}
