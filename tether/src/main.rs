// tether/src/main.rs

use clap::Parser;
use miette::Diagnostic;
use std::process::ExitCode;
use tether_core::TetherError;
use tether_core::infrastructure::error::InfrastructureError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG=debug tether sync ... to see every catalog lookup.
    // Logs go to stderr so `plan` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync {
            config,
            dry_run,
            report,
        } => commands::sync::execute(config, dry_run, report).await,
        Commands::Plan { config, output } => commands::plan::execute(config, output).await,
        Commands::RegisterTypes { config } => commands::register::execute(config).await,
        Commands::Purge {
            host,
            config,
            dry_run,
        } => commands::purge::execute(host, config, dry_run).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print the context chain, then the code and help of the first core
/// diagnostic found in it.
fn report_error(err: &anyhow::Error) {
    eprintln!("\n❌ {}", err);
    for cause in err.chain().skip(1) {
        eprintln!("   caused by: {}", cause);
    }

    let diagnostic = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<TetherError>()
            .map(|e| e as &dyn Diagnostic)
            .or_else(|| {
                cause
                    .downcast_ref::<InfrastructureError>()
                    .map(|e| e as &dyn Diagnostic)
            })
    });

    if let Some(diagnostic) = diagnostic {
        if let Some(code) = diagnostic.code() {
            eprintln!("   [{}]", code);
        }
        if let Some(help) = diagnostic.help() {
            eprintln!("💡 {}", help);
        }
    }
}
