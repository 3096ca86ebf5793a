//! Capability resolution against the ledger.

use crate::domain::{
    invariant_owner_matches, student_key, Capability, LedgerRecord, PermissionDenied,
    RecordResult, RecordStatus, StudentRecord, StudentRef,
};
use crate::ports::LedgerAccessor;
use tracing::{debug, warn};

/// Decides whether the caller of an invocation holds a capability.
///
/// Capabilities are never stored. They are recomputed on every call from the
/// caller's organization and, for `Student`, from the student record the
/// caller claims.
#[derive(Clone, Debug)]
pub struct RoleResolver {
    validator_org: String,
}

impl RoleResolver {
    /// Resolver for the given validator organization.
    pub fn new(validator_org: impl Into<String>) -> Self {
        Self {
            validator_org: validator_org.into(),
        }
    }

    /// Succeed iff the caller is a member of the validator organization.
    pub fn require_validator(&self, ledger: &dyn LedgerAccessor) -> RecordResult<()> {
        let org = ledger.caller_org();
        if org.as_str() == self.validator_org {
            return Ok(());
        }
        warn!(org = %org, "Validator capability denied");
        Err(PermissionDenied::NotValidatorOrg {
            org: org.clone(),
            required: self.validator_org.clone(),
        }
        .into())
    }

    /// Succeed iff the student record named by `student` exists, is owned by
    /// the caller and is approved. Returns that record.
    ///
    /// The claim only selects which record to check; identity always comes
    /// from the ledger accessor.
    pub fn require_student(
        &self,
        student: &StudentRef,
        ledger: &dyn LedgerAccessor,
    ) -> RecordResult<StudentRecord> {
        let key = student_key(&student.school, student.student_id);
        let Some(bytes) = ledger.get(&key)? else {
            warn!(student = %student, "Student capability denied: no record");
            return Err(PermissionDenied::StudentRecordMissing {
                school: student.school.clone(),
                student_id: student.student_id,
            }
            .into());
        };
        let record = StudentRecord::decode(&key, &bytes)?;

        if !invariant_owner_matches(&record.owner, ledger.caller_identity()) {
            warn!(
                student = %student,
                caller = %ledger.caller_identity(),
                "Student capability denied: owner mismatch"
            );
            return Err(PermissionDenied::OwnerMismatch.into());
        }
        if record.status != RecordStatus::Approved {
            warn!(
                student = %student,
                status = %record.status,
                "Student capability denied: not approved"
            );
            return Err(PermissionDenied::StudentNotApproved {
                status: record.status,
            }
            .into());
        }

        debug!(student = %student, "Student capability granted");
        Ok(record)
    }

    /// Check one capability.
    pub fn resolve(
        &self,
        capability: &Capability,
        ledger: &dyn LedgerAccessor,
    ) -> RecordResult<()> {
        match capability {
            Capability::All => Ok(()),
            Capability::Validator => self.require_validator(ledger),
            Capability::Student(student) => self.require_student(student, ledger).map(|_| ()),
        }
    }
}
