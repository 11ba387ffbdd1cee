// tether-core/src/application/plan.rs
//
// Offline preview of what a sync would ask the catalog about. No catalog call
// is made, so every row is listed whether or not its endpoints are known.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::dependency::DependencyRow;
use crate::domain::lineage::LineageProcessRecord;
use crate::domain::payload::{EntityPayload, ProcessPayload};
use crate::error::TetherError;
use crate::ports::warehouse::RowSource;

#[derive(Debug, Clone, Serialize)]
pub struct PlannedEdge {
    pub row: usize,
    pub dependency_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_url: Option<String>,
    pub referenced: EntityPayload,
    pub referencing: EntityPayload,
    pub process: ProcessPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineagePlan {
    pub generated_at: DateTime<Utc>,
    pub origin_host: String,
    pub edges: Vec<PlannedEdge>,
}

impl LineagePlan {
    pub fn build(origin_host: &str, rows: &[DependencyRow], now: DateTime<Utc>) -> Self {
        let edges = rows
            .iter()
            .enumerate()
            .map(|(row, dep)| {
                let referenced = dep.referenced_entity();
                let referencing = dep.referencing_entity();
                let payloads = (
                    EntityPayload::from_model(&referenced, None, now),
                    EntityPayload::from_model(&referencing, None, now),
                );
                let record = LineageProcessRecord::new(referenced, referencing);

                PlannedEdge {
                    row,
                    dependency_type: dep.dependency_type.clone(),
                    stage_url: dep.stage_url.clone(),
                    referenced: payloads.0,
                    referencing: payloads.1,
                    process: ProcessPayload::from(&record),
                }
            })
            .collect();

        Self {
            generated_at: now,
            origin_host: origin_host.to_string(),
            edges,
        }
    }
}

#[instrument(skip_all, fields(origin_host = source.origin_host()))]
pub async fn plan_lineage(source: &dyn RowSource) -> Result<LineagePlan, TetherError> {
    let rows = source.fetch_dependencies().await?;
    let plan = LineagePlan::build(source.origin_host(), &rows, Utc::now());
    info!(edges = plan.edges.len(), "📝 Lineage plan built");
    Ok(plan)
}
