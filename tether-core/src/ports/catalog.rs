// tether-core/src/ports/catalog.rs

// What the sync needs from a catalog service, without knowing which one or how
// it authenticates.

use crate::domain::lineage::{CatalogTypeDefinition, LineageProcessRecord};
use crate::error::TetherError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// `Ok(false)` only when the catalog positively reports no match.
    /// Network or auth failures are `TransientLookup` errors.
    async fn exists(&self, qualified_name: &str, type_name: &str) -> Result<bool, TetherError>;

    /// Submit every record in one request. An empty slice is a no-op.
    async fn upload_batch(&self, records: &[LineageProcessRecord]) -> Result<(), TetherError>;

    /// Upsert a type definition. Safe to call on every run.
    async fn register_type(&self, definition: &CatalogTypeDefinition) -> Result<(), TetherError>;
}

/// One search result, as much as deletion needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSearchHit {
    pub id: String,
    pub qualified_name: String,
    pub entity_type: String,
}

#[async_trait]
pub trait CatalogPurge: Send + Sync {
    async fn search_entities(&self, keyword: &str) -> Result<Vec<CatalogSearchHit>, TetherError>;

    async fn delete_entity(&self, guid: &str) -> Result<(), TetherError>;
}
