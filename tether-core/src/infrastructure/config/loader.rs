// tether-core/src/infrastructure/config/loader.rs

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use super::settings::TetherConfig;
use crate::infrastructure::error::InfrastructureError;

const CANDIDATES: [&str; 2] = ["tether.yaml", "tether.yml"];

/// Load configuration: explicit file, else `tether.y(a)ml` in `root`, else
/// defaults. Environment variables are layered on top in every case.
#[instrument(skip(root))]
pub fn load_config(
    explicit: Option<&Path>,
    root: &Path,
) -> Result<TetherConfig, InfrastructureError> {
    let config_path = match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(InfrastructureError::ConfigNotFound(
                path.display().to_string(),
            ));
        }
        None => find_config(root),
    };

    let mut config = match config_path {
        Some(path) => {
            info!(path = ?path, "Loading configuration");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {:?}", path))
                .map_err(|e| InfrastructureError::ConfigError(format!("{:#}", e)))?;
            serde_yaml::from_str(&content)?
        }
        None => {
            info!("No configuration file found, using defaults and environment");
            TetherConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

/// Layer `TETHER_*` variables over the file values.
pub fn apply_env_overrides<F>(config: &mut TetherConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str, slot: &mut String| {
        if let Some(val) = lookup(key) {
            info!(key, "Overriding configuration via ENV");
            *slot = val;
        }
    };

    set("TETHER_WAREHOUSE_DATABASE", &mut config.warehouse.database);
    set("TETHER_WAREHOUSE_QUERY", &mut config.warehouse.query);
    set("TETHER_WAREHOUSE_ORIGIN_HOST", &mut config.warehouse.origin_host);
    set("TETHER_CATALOG_ACCOUNT", &mut config.catalog.account);
    set("TETHER_CATALOG_TENANT_ID", &mut config.catalog.tenant_id);
    set("TETHER_CATALOG_CLIENT_ID", &mut config.catalog.client_id);
    set("TETHER_CATALOG_CLIENT_SECRET", &mut config.catalog.client_secret);

    if let Some(val) = lookup("TETHER_CATALOG_ENDPOINT") {
        info!(key = "TETHER_CATALOG_ENDPOINT", "Overriding configuration via ENV");
        config.catalog.endpoint = Some(val);
    }
}

/// Run `validator` rules and flatten them into one config error.
pub fn ensure_valid<T: Validate>(section: &str, value: &T) -> Result<(), InfrastructureError> {
    value
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("[{}] {}", section, e)))
}
