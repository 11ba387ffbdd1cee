// tether-core/src/application/mod.rs

pub mod load;
pub mod plan;
pub mod purge;
pub mod sync;
pub mod transform;

// --- RE-EXPORTS (FACADE) ---
// The CLI only needs `use tether_core::application::{run_sync, ...}`.

pub use load::{collect_records, load_records};
pub use plan::{LineagePlan, PlannedEdge, plan_lineage};
pub use purge::{PurgeReport, purge_host};
pub use sync::{SyncOptions, SyncReport, run_sync};
pub use transform::{LineageTransformer, RowOutcome, TransformStats};
