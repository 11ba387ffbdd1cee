// tether-core/src/application/load.rs

use futures::{Stream, TryStreamExt};
use tracing::{info, instrument};

use crate::domain::lineage::LineageProcessRecord;
use crate::error::TetherError;
use crate::ports::catalog::CatalogGateway;

/// Drain the stream into memory. The first error aborts.
pub async fn collect_records<S>(records: S) -> Result<Vec<LineageProcessRecord>, TetherError>
where
    S: Stream<Item = Result<LineageProcessRecord, TetherError>>,
{
    records.try_collect().await
}

/// Materialize every pending record and submit them as a single batch.
///
/// Nothing is sent when the stream yields no records. Upload errors are
/// returned as-is; there is no partial retry.
#[instrument(skip_all)]
pub async fn load_records<G, S>(
    gateway: &G,
    records: S,
) -> Result<Vec<LineageProcessRecord>, TetherError>
where
    G: CatalogGateway + ?Sized,
    S: Stream<Item = Result<LineageProcessRecord, TetherError>>,
{
    let batch = collect_records(records).await?;

    if batch.is_empty() {
        info!("No new lineage to upload");
        return Ok(batch);
    }

    info!(count = batch.len(), "Uploading lineage batch");
    gateway.upload_batch(&batch).await?;
    info!(count = batch.len(), "Lineage batch accepted");

    Ok(batch)
}
