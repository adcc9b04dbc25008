//! Errors for query building.

use thiserror::Error;

/// A scope or construction failure.
///
/// Every builder operation reports its failure synchronously through this type.
/// Printing collects them and only reports the first one when the text is
/// extracted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("undefined reference to {view} in scope {trail}")]
    Unresolved { view: String, trail: String },
    #[error("PrimaryKey already defined for table '{table}'")]
    PrimaryKeyAlreadyDefined { table: String },
    #[error("column '{column}' does not belong to table '{table}'")]
    ForeignColumn { column: String, table: String },
    #[error("column '{column}' is not defined in table '{table}'")]
    UndefinedColumn { column: String, table: String },
    #[error("table '{table}' has no PK defined")]
    MissingPrimaryKey { table: String },
    #[error("different list size: {left} and {right}")]
    ListSizeMismatch { left: usize, right: usize },
    #[error("empty list")]
    EmptyList,
    #[error("missing FROM clause")]
    MissingFrom,
    #[error("selector '{name}' is not defined in {view}")]
    UndefinedSelector { name: String, view: String },
    #[error("cannot infer the source of a join to {target}: found {candidates} candidates")]
    JoinSourceInference { target: String, candidates: usize },
    #[error("join predicate of type {predicate} is incompatible with source {source_view} and target {target}")]
    IncompatibleJoin {
        source_view: String,
        target: String,
        predicate: String,
    },
    #[error("join between {source_view} and {target} is ambiguous: {reason}")]
    AmbiguousJoin {
        source_view: String,
        target: String,
        reason: String,
    },
    #[error("{clause}: cannot resolve {expression}")]
    Rejected {
        clause: &'static str,
        expression: String,
        #[source]
        source: Box<Error>,
    },
    #[error("unable to print unnamed reference to {0}")]
    UnnamedReference(String),
    #[error("{0} is not supported")]
    NotSupported(String),
    #[error("{message} at position {position}")]
    Positioned { message: String, position: usize },
    #[error("{message}: {partial}")]
    Print { message: String, partial: String },
}

impl Error {
    /// Wrap a failure with the clause that rejected the expression.
    pub(crate) fn rejected(
        clause: &'static str,
        expression: &impl std::fmt::Display,
        source: Error,
    ) -> Error {
        Error::Rejected {
            clause,
            expression: expression.to_string(),
            source: Box::new(source),
        }
    }
}
