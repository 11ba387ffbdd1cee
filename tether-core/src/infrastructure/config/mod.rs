pub mod loader;
pub mod settings;

pub use loader::{apply_env_overrides, ensure_valid, load_config};
pub use settings::{CatalogConfig, SyncSettings, TetherConfig, WarehouseConfig};
