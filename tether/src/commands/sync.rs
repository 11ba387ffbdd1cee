// tether/src/commands/sync.rs
//
// USE CASE: Push new lineage edges to the catalog.

use std::path::PathBuf;

use anyhow::Context;
use tether_core::application::{SyncOptions, run_sync};
use tether_core::infrastructure::adapters::{AtlasCatalogGateway, DuckDBRowSource};
use tether_core::infrastructure::fs::write_json;

pub async fn execute(
    config: Option<PathBuf>,
    dry_run: bool,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    println!("⚙️  Loading configuration...");
    let config = super::load(config.as_deref())?;

    let source = DuckDBRowSource::new(&config.warehouse)
        .context("Invalid [warehouse] configuration")?;
    let gateway = AtlasCatalogGateway::new(&config.catalog)
        .context("Invalid [catalog] configuration")?;
    println!("   Warehouse: {}", config.warehouse.database);
    println!("   Catalog: {}", gateway.base_url());
    if dry_run {
        println!("   Mode: dry run (nothing will be written)");
    }

    let options = SyncOptions {
        memoize_lookups: config.sync.memoize_lookups,
        dry_run,
    };
    let result = run_sync(&source, &gateway, options)
        .await
        .context("Lineage sync failed")?;

    let stats = &result.stats;
    println!("\n📊 {} dependency rows read", result.rows_read);
    println!("   Unknown referenced object:  {}", stats.skipped_unknown_referenced);
    println!("   Unknown referencing object: {}", stats.skipped_unknown_referencing);
    println!("   Already ingested:           {}", stats.skipped_already_ingested);
    println!("   Duplicate rows:             {}", stats.skipped_duplicate);
    if result.dry_run {
        println!("   Would upload:               {}", result.uploaded);
    } else {
        println!("   Uploaded:                   {}", result.uploaded);
    }

    if let Some(path) = report.or(config.sync.report_path) {
        write_json(&path, &result)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("📝 Report written to {}", path.display());
    }

    println!("\n✨ SUCCESS! Sync finished in {:.2?}", start.elapsed());
    Ok(())
}
