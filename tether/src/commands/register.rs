// tether/src/commands/register.rs
//
// USE CASE: Register custom lineage types ahead of the first sync.

use std::path::PathBuf;

use anyhow::Context;
use tether_core::domain::CatalogTypeDefinition;
use tether_core::infrastructure::adapters::AtlasCatalogGateway;
use tether_core::ports::CatalogGateway;

pub async fn execute(config: Option<PathBuf>) -> anyhow::Result<()> {
    println!("⚙️  Loading configuration...");
    let config = super::load(config.as_deref())?;

    let gateway = AtlasCatalogGateway::new(&config.catalog)
        .context("Invalid [catalog] configuration")?;

    let definition = CatalogTypeDefinition::stage_load();
    gateway
        .register_type(&definition)
        .await
        .with_context(|| format!("Failed to register type '{}'", definition.name))?;

    println!("✨ Type '{}' registered at {}", definition.name, gateway.base_url());
    Ok(())
}
