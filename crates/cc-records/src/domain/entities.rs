//! # Domain Entities
//!
//! The three record kinds kept on the ledger and the submissions they are
//! created from.
//!
//! Every record carries the identity that created it (`owner`, written once)
//! and its approval `status`. Field names on the wire are fixed by the serde
//! renames below and must stay stable across versions.

use super::errors::{RecordError, RecordResult};
use super::keys::{grade_key, prize_key, student_key, RecordKey};
use super::value_objects::{IdentityId, RecordKind, RecordStatus, StudentRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour shared by every record kind.
pub trait LedgerRecord: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// Kind of this record.
    const KIND: RecordKind;

    /// Storage key derived from the identifying fields.
    fn key(&self) -> RecordKey;

    /// Identity that created the record.
    fn owner(&self) -> &IdentityId;

    /// Current approval status.
    fn status(&self) -> RecordStatus;

    /// Overwrite the approval status.
    fn set_status(&mut self, status: RecordStatus);

    /// Encode for storage.
    fn encode(&self) -> RecordResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }

    /// Decode the bytes stored at `key`.
    fn decode(key: &RecordKey, bytes: &[u8]) -> RecordResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| RecordError::Corrupt {
            kind: Self::KIND,
            key: key.clone(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// STUDENT
// =============================================================================

/// Student enrollment record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// School name.
    pub school: String,
    /// Major.
    pub major: String,
    /// Numeric student id.
    pub id: u64,
    /// Student name.
    pub name: String,
    /// Creator identity.
    pub owner: IdentityId,
    /// Approval status.
    pub status: RecordStatus,
}

/// Input of `addStudent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    /// School name.
    pub school: String,
    /// Major.
    pub major: String,
    /// Numeric student id.
    pub id: u64,
    /// Student name.
    pub name: String,
}

impl StudentRecord {
    /// Build a `Pending` record owned by `owner`.
    pub fn pending(new: NewStudent, owner: IdentityId) -> Self {
        Self {
            school: new.school,
            major: new.major,
            id: new.id,
            name: new.name,
            owner,
            status: RecordStatus::Pending,
        }
    }

    /// The (school, id) pair this record vouches for.
    pub fn student_ref(&self) -> StudentRef {
        StudentRef::new(self.school.clone(), self.id)
    }
}

impl LedgerRecord for StudentRecord {
    const KIND: RecordKind = RecordKind::Student;

    fn key(&self) -> RecordKey {
        student_key(&self.school, self.id)
    }

    fn owner(&self) -> &IdentityId {
        &self.owner
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }
}

// =============================================================================
// GRADE
// =============================================================================

/// Course grade record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Course name.
    pub course: String,
    /// Course id.
    #[serde(rename = "courseId")]
    pub course_id: String,
    /// Teacher name.
    pub teacher: String,
    /// School name.
    pub school: String,
    /// Student id.
    #[serde(rename = "studentId")]
    pub student_id: u64,
    /// Academic year.
    pub year: u32,
    /// Semester within the year.
    pub semester: u32,
    /// Score.
    pub score: f64,
    /// Creator identity.
    pub owner: IdentityId,
    /// Approval status.
    pub status: RecordStatus,
}

/// Input of `addGrade`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewGrade {
    /// Course name.
    pub course: String,
    /// Course id.
    pub course_id: String,
    /// Teacher name.
    pub teacher: String,
    /// School name.
    pub school: String,
    /// Student id.
    pub student_id: u64,
    /// Academic year.
    pub year: u32,
    /// Semester.
    pub semester: u32,
    /// Score, always finite.
    pub score: f64,
}

impl NewGrade {
    /// Student the grade is submitted for.
    pub fn student_ref(&self) -> StudentRef {
        StudentRef::new(self.school.clone(), self.student_id)
    }
}

impl GradeRecord {
    /// Build a `Pending` record owned by `owner`.
    pub fn pending(new: NewGrade, owner: IdentityId) -> Self {
        Self {
            course: new.course,
            course_id: new.course_id,
            teacher: new.teacher,
            school: new.school,
            student_id: new.student_id,
            year: new.year,
            semester: new.semester,
            score: new.score,
            owner,
            status: RecordStatus::Pending,
        }
    }
}

impl LedgerRecord for GradeRecord {
    const KIND: RecordKind = RecordKind::Grade;

    fn key(&self) -> RecordKey {
        grade_key(
            &self.school,
            self.student_id,
            &self.course_id,
            self.year,
            self.semester,
        )
    }

    fn owner(&self) -> &IdentityId {
        &self.owner
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }
}

// =============================================================================
// PRIZE
// =============================================================================

/// Prize record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRecord {
    /// Prize name.
    pub name: String,
    /// Globally unique prize id.
    pub id: String,
    /// Year awarded.
    pub year: u32,
    /// Prize level.
    pub level: String,
    /// Awarding institution.
    pub institution: String,
    /// Creator identity.
    pub owner: IdentityId,
    /// Approval status.
    pub status: RecordStatus,
}

/// Input of `addPrize`.
///
/// `student` is the capability claim only; it is not stored on the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPrize {
    /// Claimed student.
    pub student: StudentRef,
    /// Prize name.
    pub name: String,
    /// Prize id.
    pub id: String,
    /// Year awarded.
    pub year: u32,
    /// Prize level.
    pub level: String,
    /// Awarding institution.
    pub institution: String,
}

impl PrizeRecord {
    /// Build a `Pending` record owned by `owner`.
    pub fn pending(new: NewPrize, owner: IdentityId) -> Self {
        Self {
            name: new.name,
            id: new.id,
            year: new.year,
            level: new.level,
            institution: new.institution,
            owner,
            status: RecordStatus::Pending,
        }
    }
}

impl LedgerRecord for PrizeRecord {
    const KIND: RecordKind = RecordKind::Prize;

    fn key(&self) -> RecordKey {
        prize_key(&self.id)
    }

    fn owner(&self) -> &IdentityId {
        &self.owner
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> IdentityId {
        IdentityId::new("x509::CN=alice")
    }

    #[test]
    fn test_student_pending() {
        let record = StudentRecord::pending(
            NewStudent {
                school: "MIT".into(),
                major: "CS".into(),
                id: 1,
                name: "Alice".into(),
            },
            alice(),
        );
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(record.owner, alice());
        assert_eq!(record.key(), student_key("MIT", 1));
    }

    #[test]
    fn test_student_wire_format() {
        let record = StudentRecord {
            school: "MIT".into(),
            major: "CS".into(),
            id: 1,
            name: "Alice".into(),
            owner: alice(),
            status: RecordStatus::Approved,
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["school"], "MIT");
        assert_eq!(json["id"], 1);
        assert_eq!(json["owner"], "x509::CN=alice");
        assert_eq!(json["status"], "Approved");
    }

    #[test]
    fn test_grade_wire_format_uses_camel_case_ids() {
        let record = GradeRecord::pending(
            NewGrade {
                course: "Algorithms".into(),
                course_id: "6.006".into(),
                teacher: "Demaine".into(),
                school: "MIT".into(),
                student_id: 1,
                year: 2024,
                semester: 2,
                score: 93.5,
            },
            alice(),
        );
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["courseId"], "6.006");
        assert_eq!(json["studentId"], 1);
        assert_eq!(json["score"], 93.5);
        assert_eq!(record.key(), grade_key("MIT", 1, "6.006", 2024, 2));
    }

    #[test]
    fn test_prize_key_uses_prize_id_only() {
        let record = PrizeRecord::pending(
            NewPrize {
                student: StudentRef::new("MIT", 1),
                name: "Putnam".into(),
                id: "PUT-2024-7".into(),
                year: 2024,
                level: "national".into(),
                institution: "MAA".into(),
            },
            alice(),
        );
        assert_eq!(record.key(), prize_key("PUT-2024-7"));
        assert_eq!(PrizeRecord::KIND, RecordKind::Prize);
    }

    #[test]
    fn test_decode_garbage_is_corrupt() {
        let key = student_key("MIT", 1);
        let err = StudentRecord::decode(&key, b"{\"school\":").unwrap_err();
        assert!(matches!(err, RecordError::Corrupt { kind: RecordKind::Student, .. }));
    }

    #[test]
    fn test_encode_decode_student() {
        let record = StudentRecord::pending(
            NewStudent {
                school: "MIT".into(),
                major: "CS".into(),
                id: 7,
                name: "Bea".into(),
            },
            alice(),
        );
        let bytes = record.encode().unwrap();
        assert_eq!(StudentRecord::decode(&record.key(), &bytes).unwrap(), record);
    }
}
