// tether-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{CatalogError, InfrastructureError, WarehouseError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum TetherError {
    // --- DOMAIN ERRORS (row schema, object kinds) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (warehouse, catalog, IO) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    #[diagnostic(code(tether::internal))]
    InternalError(String),
}

impl From<CatalogError> for TetherError {
    fn from(err: CatalogError) -> Self {
        TetherError::Infrastructure(InfrastructureError::Catalog(err))
    }
}

impl From<WarehouseError> for TetherError {
    fn from(err: WarehouseError) -> Self {
        TetherError::Infrastructure(InfrastructureError::Warehouse(err))
    }
}

impl From<std::io::Error> for TetherError {
    fn from(err: std::io::Error) -> Self {
        TetherError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl TetherError {
    /// Borrow the catalog error if this is one.
    pub fn as_catalog(&self) -> Option<&CatalogError> {
        match self {
            TetherError::Infrastructure(InfrastructureError::Catalog(e)) => Some(e),
            _ => None,
        }
    }
}
