// tether-core/src/application/purge.rs

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::TetherError;
use crate::ports::catalog::{CatalogPurge, CatalogSearchHit};

#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub host: String,
    pub dry_run: bool,
    /// Hits that were deleted, or would have been on a dry run.
    pub entities: Vec<CatalogSearchHit>,
}

/// Delete every catalog entity registered for `host`: scanned datasets and
/// the lineage processes between them.
///
/// Search is keyword based, so hits whose qualified name does not mention the
/// host are left alone. Deletion stops at the first failure.
#[instrument(skip(catalog))]
pub async fn purge_host<P>(catalog: &P, host: &str, dry_run: bool) -> Result<PurgeReport, TetherError>
where
    P: CatalogPurge + ?Sized,
{
    let host = host.trim();
    if host.is_empty() {
        return Err(TetherError::InternalError(
            "refusing to purge without a host".to_string(),
        ));
    }

    let hits: Vec<CatalogSearchHit> = catalog
        .search_entities(host)
        .await?
        .into_iter()
        .filter(|hit| hit.qualified_name.contains(host))
        .collect();

    if hits.is_empty() {
        warn!(host, "No catalog entities found for host");
    }

    for hit in &hits {
        if dry_run {
            info!(entity_type = %hit.entity_type, qualified_name = %hit.qualified_name, "Would delete");
            continue;
        }
        debug!(guid = %hit.id, entity_type = %hit.entity_type, "Deleting entity");
        catalog.delete_entity(&hit.id).await?;
        info!(entity_type = %hit.entity_type, qualified_name = %hit.qualified_name, "🗑️ Deleted");
    }

    Ok(PurgeReport {
        host: host.to_string(),
        dry_run,
        entities: hits,
    })
}
