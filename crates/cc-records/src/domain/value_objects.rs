//! # Value Objects
//!
//! Identities, record status, record kinds, capabilities and the workflow
//! policies selected by configuration.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verified identity of the invoking participant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Wrap an identity string issued by the host platform.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identity.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Organization the caller's identity belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Wrap an organization identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw organization identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approval state of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Submitted, awaiting a validator decision.
    Pending,
    /// Accepted by a validator; visible to queries.
    Approved,
    /// Refused by a validator.
    Rejected,
}

impl RecordStatus {
    /// Wire literal of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// `Approved` and `Rejected` are terminal.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Parse the target of a validate operation.
    ///
    /// Only the exact literals `Approved` and `Rejected` are accepted.
    pub fn parse_target(value: &str) -> Result<Self, ValidationError> {
        match value {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three entity kinds kept on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Student enrollment.
    Student,
    /// Course grade.
    Grade,
    /// Prize or award.
    Prize,
}

impl RecordKind {
    /// All kinds, in key-namespace order.
    pub const ALL: [RecordKind; 3] = [RecordKind::Student, RecordKind::Grade, RecordKind::Prize];

    /// Namespace tag used in storage keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Grade => "grade",
            Self::Prize => "prize",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "grade" => Ok(Self::Grade),
            // "price" is the historical spelling of the prize operations.
            "prize" | "price" => Ok(Self::Prize),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// A (school, student id) pair naming one student record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StudentRef {
    /// School name.
    pub school: String,
    /// Numeric student id within the school.
    pub student_id: u64,
}

impl StudentRef {
    /// Create a reference.
    pub fn new(school: impl Into<String>, student_id: u64) -> Self {
        Self {
            school: school.into(),
            student_id,
        }
    }
}

impl fmt::Display for StudentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.school, self.student_id)
    }
}

/// Permission token computed per invocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Held by every caller.
    All,
    /// Held by members of the validator organization.
    Validator,
    /// Held by the owner of an approved student record.
    Student(StudentRef),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Validator => f.write_str("validator"),
            Self::Student(student) => write!(f, "student({student})"),
        }
    }
}

/// Which status transitions a validator may perform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Only `Pending -> Approved` and `Pending -> Rejected`.
    #[default]
    Strict,
    /// Any current status may be moved to `Approved` or `Rejected`.
    Permissive,
}

/// How queries report records that exist but are not approved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDisclosure {
    /// `NotFound` and `NotApproved` are reported separately.
    #[default]
    Distinct,
    /// Non-approved records are reported as `NotFound`.
    Collapsed,
}

/// What a create operation does when its key is already occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the existing record with a fresh `Pending` one.
    #[default]
    Overwrite,
    /// Fail with `Duplicate`.
    Reject,
}

macro_rules! policy_from_str {
    ($ty:ty, $($lit:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($lit => Ok($variant),)+
                    other => Err(other.to_string()),
                }
            }
        }
    };
}

policy_from_str!(
    TransitionPolicy,
    "strict" => TransitionPolicy::Strict,
    "permissive" => TransitionPolicy::Permissive,
);
policy_from_str!(
    QueryDisclosure,
    "distinct" => QueryDisclosure::Distinct,
    "collapsed" => QueryDisclosure::Collapsed,
);
policy_from_str!(
    DuplicatePolicy,
    "overwrite" => DuplicatePolicy::Overwrite,
    "reject" => DuplicatePolicy::Reject,
);
