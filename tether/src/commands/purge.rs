// tether/src/commands/purge.rs
//
// USE CASE: Remove everything a warehouse host put in the catalog.

use std::path::PathBuf;

use anyhow::Context;
use tether_core::application::purge_host;
use tether_core::infrastructure::adapters::AtlasCatalogGateway;

pub async fn execute(host: String, config: Option<PathBuf>, dry_run: bool) -> anyhow::Result<()> {
    println!("⚙️  Loading configuration...");
    let config = super::load(config.as_deref())?;

    let gateway = AtlasCatalogGateway::new(&config.catalog)
        .context("Invalid [catalog] configuration")?;

    let report = purge_host(&gateway, &host, dry_run)
        .await
        .with_context(|| format!("Purge of host '{}' failed", host))?;

    for hit in &report.entities {
        let verb = if report.dry_run { "would delete" } else { "deleted" };
        println!("   🗑️  {} {} ({})", verb, hit.qualified_name, hit.entity_type);
    }

    if report.entities.is_empty() {
        println!("⚠️  Nothing found for host '{}'", report.host);
    } else if report.dry_run {
        println!("\n{} entities would be deleted", report.entities.len());
    } else {
        println!("\n✨ {} entities deleted", report.entities.len());
    }
    Ok(())
}
