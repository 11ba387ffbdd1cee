// tether-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema validation failed on row {row}: {reason}")]
    #[diagnostic(
        code(tether::domain::schema_validation),
        help("Check the dependency query: every required column must be present and non-null.")
    )]
    SchemaValidation { row: usize, reason: String },

    #[error("Dependency query is missing required column(s): {}", .0.join(", "))]
    #[diagnostic(
        code(tether::domain::schema_validation),
        help("Column names are matched case-insensitively. Alias the query columns if needed.")
    )]
    MissingColumns(Vec<String>),

    #[error("Unknown object kind: '{0}'")]
    #[diagnostic(code(tether::domain::object_kind))]
    UnknownObjectKind(String),
}
