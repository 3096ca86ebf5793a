//! Invocation table: name, aliases, arity, operation kind and parser for
//! every supported function.
//!
//! Required capabilities are derived from the parsed [`Command`], since a
//! student claim depends on the arguments.

use crate::dispatch::{Command, OperationKind};
use crate::domain::{NewGrade, NewPrize, NewStudent, RecordKind, ValidationError};
use crate::lifecycle::{fields, GradeLocator, PrizeLocator, StatusChange, StudentLocator};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Parser from positional arguments to a [`Command`].
pub type ParseFn = fn(&str, &[String]) -> Result<Command, ValidationError>;

/// One row of the invocation table.
#[derive(Clone)]
pub struct InvocationSpec {
    /// Canonical name.
    pub name: &'static str,
    /// Accepted alternative spellings.
    pub aliases: &'static [&'static str],
    /// Exact positional argument count.
    pub arity: usize,
    /// Operation kind.
    pub operation: OperationKind,
    /// Argument parser.
    pub parse: ParseFn,
}

impl fmt::Debug for InvocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// Every supported invocation.
pub static INVOCATION_TABLE: &[InvocationSpec] = &[
    InvocationSpec {
        name: "addStudent",
        aliases: &[],
        arity: 4,
        operation: OperationKind::Create,
        parse: |f, args| NewStudent::parse(f, args).map(Command::AddStudent),
    },
    InvocationSpec {
        name: "addGrade",
        aliases: &[],
        arity: 8,
        operation: OperationKind::Create,
        parse: |f, args| NewGrade::parse(f, args).map(Command::AddGrade),
    },
    InvocationSpec {
        name: "addPrize",
        aliases: &["addPrice"],
        arity: 7,
        operation: OperationKind::Create,
        parse: |f, args| NewPrize::parse(f, args).map(Command::AddPrize),
    },
    InvocationSpec {
        name: "validateStudent",
        aliases: &[],
        arity: 3,
        operation: OperationKind::Validate,
        parse: |f, args| {
            StatusChange::<StudentLocator>::parse(f, args).map(Command::ValidateStudent)
        },
    },
    InvocationSpec {
        name: "validateGrade",
        aliases: &[],
        arity: 6,
        operation: OperationKind::Validate,
        parse: |f, args| StatusChange::<GradeLocator>::parse(f, args).map(Command::ValidateGrade),
    },
    InvocationSpec {
        name: "validatePrize",
        aliases: &["validatePrice"],
        arity: 2,
        operation: OperationKind::Validate,
        parse: |f, args| StatusChange::<PrizeLocator>::parse(f, args).map(Command::ValidatePrize),
    },
    InvocationSpec {
        name: "queryStudent",
        aliases: &[],
        arity: 2,
        operation: OperationKind::Query,
        parse: |f, args| StudentLocator::parse(f, args).map(Command::QueryStudent),
    },
    InvocationSpec {
        name: "queryGrade",
        aliases: &[],
        arity: 5,
        operation: OperationKind::Query,
        parse: |f, args| GradeLocator::parse(f, args).map(Command::QueryGrade),
    },
    InvocationSpec {
        name: "queryPrize",
        aliases: &["queryPrice"],
        arity: 1,
        operation: OperationKind::Query,
        parse: |f, args| PrizeLocator::parse(f, args).map(Command::QueryPrize),
    },
    InvocationSpec {
        name: "listPending",
        aliases: &[],
        arity: 1,
        operation: OperationKind::List,
        parse: |f, args| {
            let [kind] = fields::<1>(f, args)?;
            kind.parse::<RecordKind>().map(Command::ListPending)
        },
    },
];

static INDEX: LazyLock<HashMap<&'static str, &'static InvocationSpec>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for spec in INVOCATION_TABLE {
        index.insert(spec.name, spec);
        for alias in spec.aliases {
            index.insert(*alias, spec);
        }
    }
    index
});

/// Find the table row for `function`, by canonical name or alias.
pub fn lookup(function: &str) -> Option<&'static InvocationSpec> {
    INDEX.get(function).copied()
}
