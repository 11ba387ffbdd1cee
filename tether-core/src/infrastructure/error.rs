// tether-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum WarehouseError {
    #[error("Warehouse query failed: {0}")]
    #[diagnostic(
        code(tether::infra::warehouse::query),
        help("The dependency query could not be executed. Check the database path and SQL.")
    )]
    QueryExecution(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum CatalogError {
    #[error("Catalog lookup failed for '{qualified_name}' ({type_name}): {reason}")]
    #[diagnostic(
        code(tether::infra::catalog::lookup),
        help("A lookup failure is never treated as 'not found'. Re-run once the catalog is reachable.")
    )]
    TransientLookup {
        qualified_name: String,
        type_name: String,
        reason: String,
    },

    #[error("Catalog upload failed, {attempted} record(s) not persisted: {reason}")]
    #[diagnostic(
        code(tether::infra::catalog::upload),
        help("Nothing from this batch is assumed persisted. Re-run the whole pass.")
    )]
    Upload { attempted: usize, reason: String },

    #[error("Type registration failed for '{type_name}': {reason}")]
    #[diagnostic(code(tether::infra::catalog::typedef))]
    TypeRegistration { type_name: String, reason: String },

    #[error("Catalog authentication failed: {0}")]
    #[diagnostic(
        code(tether::infra::catalog::auth),
        help("Check tenant id, client id and client secret of the service principal.")
    )]
    Auth(String),

    #[error("Catalog search failed for '{keyword}': {reason}")]
    #[diagnostic(code(tether::infra::catalog::search))]
    Search { keyword: String, reason: String },

    #[error("Catalog delete failed for guid '{guid}': {reason}")]
    #[diagnostic(code(tether::infra::catalog::delete))]
    Delete { guid: String, reason: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- WAREHOUSE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Warehouse(#[from] WarehouseError),

    // --- CATALOG ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(tether::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(tether::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(tether::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(tether::infra::config))]
    ConfigError(String),

    #[error("Configuration not found at '{0}'")]
    #[diagnostic(code(tether::infra::config_missing))]
    ConfigNotFound(String),
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Warehouse(WarehouseError::QueryExecution(err))
    }
}
