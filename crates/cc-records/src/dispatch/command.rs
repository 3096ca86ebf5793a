//! Parsed invocations.

use crate::domain::{Capability, NewGrade, NewPrize, NewStudent, RecordKind};
use crate::lifecycle::{GradeLocator, PrizeLocator, StatusChange, StudentLocator};

/// What an operation does to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Writes a new `Pending` record.
    Create,
    /// Changes the status of an existing record.
    Validate,
    /// Reads one approved record.
    Query,
    /// Reads every pending record of a kind.
    List,
}

impl OperationKind {
    /// Whether the operation may write to the ledger.
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Validate)
    }
}

/// A parsed invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `addStudent`
    AddStudent(NewStudent),
    /// `addGrade`
    AddGrade(NewGrade),
    /// `addPrize`
    AddPrize(NewPrize),
    /// `validateStudent`
    ValidateStudent(StatusChange<StudentLocator>),
    /// `validateGrade`
    ValidateGrade(StatusChange<GradeLocator>),
    /// `validatePrize`
    ValidatePrize(StatusChange<PrizeLocator>),
    /// `queryStudent`
    QueryStudent(StudentLocator),
    /// `queryGrade`
    QueryGrade(GradeLocator),
    /// `queryPrize`
    QueryPrize(PrizeLocator),
    /// `listPending`
    ListPending(RecordKind),
}

impl Command {
    /// Canonical invocation name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddStudent(_) => "addStudent",
            Self::AddGrade(_) => "addGrade",
            Self::AddPrize(_) => "addPrize",
            Self::ValidateStudent(_) => "validateStudent",
            Self::ValidateGrade(_) => "validateGrade",
            Self::ValidatePrize(_) => "validatePrize",
            Self::QueryStudent(_) => "queryStudent",
            Self::QueryGrade(_) => "queryGrade",
            Self::QueryPrize(_) => "queryPrize",
            Self::ListPending(_) => "listPending",
        }
    }

    /// Operation kind.
    pub const fn operation(&self) -> OperationKind {
        match self {
            Self::AddStudent(_) | Self::AddGrade(_) | Self::AddPrize(_) => OperationKind::Create,
            Self::ValidateStudent(_) | Self::ValidateGrade(_) | Self::ValidatePrize(_) => {
                OperationKind::Validate
            }
            Self::QueryStudent(_) | Self::QueryGrade(_) | Self::QueryPrize(_) => {
                OperationKind::Query
            }
            Self::ListPending(_) => OperationKind::List,
        }
    }

    /// Capability the caller must hold before the handler runs.
    ///
    /// Grade and prize submissions are bound to the student named in their
    /// own arguments.
    pub fn required_capability(&self) -> Capability {
        match self {
            Self::AddStudent(_)
            | Self::QueryStudent(_)
            | Self::QueryGrade(_)
            | Self::QueryPrize(_) => Capability::All,
            Self::AddGrade(grade) => Capability::Student(grade.student_ref()),
            Self::AddPrize(prize) => Capability::Student(prize.student.clone()),
            Self::ValidateStudent(_)
            | Self::ValidateGrade(_)
            | Self::ValidatePrize(_)
            | Self::ListPending(_) => Capability::Validator,
        }
    }
}
