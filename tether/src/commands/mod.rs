// tether/src/commands/mod.rs

pub mod plan;
pub mod purge;
pub mod register;
pub mod sync;

use anyhow::Context;
use std::path::{Path, PathBuf};
use tether_core::infrastructure::config::{TetherConfig, load_config};

/// Config file (explicit or discovered in the working directory) plus
/// `TETHER_*` environment overrides.
pub fn load(config: Option<&Path>) -> anyhow::Result<TetherConfig> {
    let root: PathBuf = std::env::current_dir().context("Cannot read the current directory")?;
    load_config(config, &root).with_context(|| match config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => format!("Failed to load configuration from {}", root.display()),
    })
}
