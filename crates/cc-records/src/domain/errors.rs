//! # Domain Errors
//!
//! Error taxonomy for record invocations. Every failure is reported to the
//! caller synchronously; nothing is retried here.

use super::keys::RecordKey;
use super::value_objects::{OrgId, RecordKind, RecordStatus};
use std::fmt;
use thiserror::Error;

/// Result alias used across the crate.
pub type RecordResult<T> = Result<T, RecordError>;

/// Malformed invocation input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong number of positional arguments.
    #[error("{function} expects {expected} arguments, got {got}")]
    Arity {
        /// Invoked function.
        function: String,
        /// Declared arity.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// A text field was empty.
    #[error("field `{field}` must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },

    /// A numeric field did not parse.
    #[error("field `{field}` is not a valid {expected}: {value:?}")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
        /// Expected numeric type.
        expected: &'static str,
        /// Raw input.
        value: String,
    },

    /// Validation target was not `Approved` or `Rejected`.
    #[error("invalid status {0:?}: only 'Approved' or 'Rejected' are accepted")]
    InvalidStatus(String),

    /// Unknown record kind literal.
    #[error("unknown record kind {0:?}")]
    UnknownKind(String),
}

/// Reasons a capability was not granted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionDenied {
    /// Caller is not a member of the validator organization.
    #[error("organization {org} is not the validator organization {required}")]
    NotValidatorOrg {
        /// Caller organization.
        org: OrgId,
        /// Configured validator organization.
        required: String,
    },

    /// No student record exists for the claimed pair.
    #[error("no student record for school {school:?} id {student_id}")]
    StudentRecordMissing {
        /// Claimed school.
        school: String,
        /// Claimed student id.
        student_id: u64,
    },

    /// The claimed student record belongs to another identity.
    #[error("student record is owned by another identity")]
    OwnerMismatch,

    /// The claimed student record exists but is not approved.
    #[error("student record is {status}, not Approved")]
    StudentNotApproved {
        /// Current status of the claimed record.
        status: RecordStatus,
    },
}

/// Failures reported by the ledger backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Read could not be served.
    #[error("ledger read failed: {0}")]
    ReadFailed(String),

    /// Write was rejected.
    #[error("ledger write rejected: {0}")]
    WriteFailed(String),
}

/// Error returned by every record invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Bad arity, unparsable field or invalid status literal.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Required capability not held.
    #[error("permission denied: {0}")]
    Permission(#[from] PermissionDenied),

    /// No record at the derived key.
    #[error("{kind} record not found at {key}")]
    NotFound {
        /// Record kind.
        kind: RecordKind,
        /// Derived key.
        key: RecordKey,
    },

    /// Record exists but is not approved.
    #[error("{kind} record at {key} is not approved")]
    NotApproved {
        /// Record kind.
        kind: RecordKind,
        /// Derived key.
        key: RecordKey,
    },

    /// Transition not allowed by the configured policy.
    #[error("{kind} record at {key} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Record kind.
        kind: RecordKind,
        /// Derived key.
        key: RecordKey,
        /// Current status.
        from: RecordStatus,
        /// Requested status.
        to: RecordStatus,
    },

    /// Create hit an occupied key under the `reject` duplicate policy.
    #[error("{kind} record already exists at {key}")]
    Duplicate {
        /// Record kind.
        kind: RecordKind,
        /// Derived key.
        key: RecordKey,
    },

    /// Ledger read or write failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] LedgerError),

    /// Stored bytes could not be decoded as the expected record.
    #[error("stored {kind} record at {key} is unreadable: {reason}")]
    Corrupt {
        /// Expected kind.
        kind: RecordKind,
        /// Key read.
        key: RecordKey,
        /// Decoder message.
        reason: String,
    },

    /// Response encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unknown invocation name.
    #[error("invalid function name {0:?}")]
    InvalidFunction(String),
}

impl RecordError {
    /// Externally visible error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Permission(_) => ErrorKind::Permission,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotApproved { .. } => ErrorKind::NotApproved,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::Persistence(_) | Self::Corrupt { .. } | Self::Serialization(_) => {
                ErrorKind::Persistence
            }
            Self::InvalidFunction(_) => ErrorKind::InvalidFunction,
        }
    }
}

/// Stable error categories, used for CLI output and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `ValidationError`
    Validation,
    /// `PermissionError`
    Permission,
    /// `NotFoundError`
    NotFound,
    /// `NotApprovedError`
    NotApproved,
    /// `InvalidTransitionError`
    InvalidTransition,
    /// `DuplicateError`
    Duplicate,
    /// `PersistenceError`
    Persistence,
    /// `InvalidFunctionError`
    InvalidFunction,
}

impl ErrorKind {
    /// Category name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Permission => "PermissionError",
            Self::NotFound => "NotFoundError",
            Self::NotApproved => "NotApprovedError",
            Self::InvalidTransition => "InvalidTransitionError",
            Self::Duplicate => "DuplicateError",
            Self::Persistence => "PersistenceError",
            Self::InvalidFunction => "InvalidFunctionError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
