// tether/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Pushes warehouse object dependencies into a data catalog as lineage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔗 Reads dependencies and uploads the missing lineage edges
    Sync {
        /// Config file (default: tether.yaml in the current directory)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Run every catalog lookup but register and upload nothing
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Write a JSON run report here (overrides sync.report_path)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 📝 Previews the catalog payloads without contacting the catalog
    Plan {
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Write the plan to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 🧩 Registers the stage-load lineage type in the catalog
    RegisterTypes {
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// 🗑️ Deletes every catalog entity registered for a warehouse host
    Purge {
        /// Warehouse host, as it appears in qualified names
        #[arg(long)]
        host: String,

        #[arg(long, short)]
        config: Option<PathBuf>,

        /// List what would be deleted
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
}
