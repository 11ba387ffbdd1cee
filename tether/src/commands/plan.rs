// tether/src/commands/plan.rs
//
// USE CASE: Offline preview of the lineage payloads.

use std::path::PathBuf;

use anyhow::Context;
use tether_core::application::plan_lineage;
use tether_core::infrastructure::adapters::DuckDBRowSource;
use tether_core::infrastructure::fs::write_json;

pub async fn execute(config: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::load(config.as_deref())?;

    let source = DuckDBRowSource::new(&config.warehouse)
        .context("Invalid [warehouse] configuration")?;
    let plan = plan_lineage(&source)
        .await
        .context("Failed to read dependency rows")?;

    match output {
        Some(path) => {
            write_json(&path, &plan)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            println!("📝 {} edges planned, written to {}", plan.edges.len(), path.display());
        }
        // stdout carries only the JSON so it can be piped
        None => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}
