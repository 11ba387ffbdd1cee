// tether-core/src/application/sync.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::application::load::{collect_records, load_records};
use crate::application::transform::{LineageTransformer, TransformStats};
use crate::domain::lineage::CatalogTypeDefinition;
use crate::error::TetherError;
use crate::ports::catalog::CatalogGateway;
use crate::ports::warehouse::RowSource;

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub memoize_lookups: bool,
    /// Run every lookup but register and upload nothing.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            memoize_lookups: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub origin_host: String,
    pub dry_run: bool,
    pub rows_read: usize,
    pub stats: TransformStats,
    /// Records sent to the catalog (or that would have been, on a dry run).
    pub uploaded: usize,
    pub processes: Vec<String>,
}

/// One full sync: read dependency rows, register the stage-load type, keep
/// the edges the catalog can anchor and does not already have, then upload
/// them in one batch.
///
/// Any error aborts the run. Rows are fetched and validated before the first
/// catalog call, so a warehouse or schema failure leaves the catalog
/// untouched. A registration failure aborts before any lookup.
#[instrument(skip_all, fields(origin_host = source.origin_host(), dry_run = options.dry_run))]
pub async fn run_sync<G>(
    source: &dyn RowSource,
    gateway: &G,
    options: SyncOptions,
) -> Result<SyncReport, TetherError>
where
    G: CatalogGateway + ?Sized,
{
    let started_at = Utc::now();
    info!("🔗 Starting lineage sync...");

    let rows = source.fetch_dependencies().await?;
    let rows_read = rows.len();
    info!(rows = rows_read, "📦 Dependency rows fetched");
    if rows.is_empty() {
        warn!("Warehouse returned no dependency rows");
    }

    let stage_load = CatalogTypeDefinition::stage_load();
    if options.dry_run {
        info!(type_name = %stage_load.name, "Dry run, skipping type registration");
    } else {
        gateway.register_type(&stage_load).await?;
        info!(type_name = %stage_load.name, "Type definition registered");
    }

    let mut transformer = LineageTransformer::new(gateway, options.memoize_lookups);
    let records = if options.dry_run {
        collect_records(transformer.records(rows)).await?
    } else {
        load_records(gateway, transformer.records(rows)).await?
    };
    let stats = transformer.stats();

    info!(
        rows = stats.rows_seen,
        emitted = stats.emitted,
        unknown_referenced = stats.skipped_unknown_referenced,
        unknown_referencing = stats.skipped_unknown_referencing,
        already_ingested = stats.skipped_already_ingested,
        duplicates = stats.skipped_duplicate,
        "✅ Sync finished"
    );

    Ok(SyncReport {
        started_at,
        finished_at: Utc::now(),
        origin_host: source.origin_host().to_string(),
        dry_run: options.dry_run,
        rows_read,
        stats,
        uploaded: records.len(),
        processes: records.into_iter().map(|r| r.qualified_name).collect(),
    })
}
