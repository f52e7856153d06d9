//! Document generation CLI
//!
//! Command-line host for the template engine: browse the catalog, inspect
//! variable schemas, generate documents, and validate candidate templates.
//! JSON results go to stdout; logs go to stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use template_engine::{CatalogHandle, DocumentEngine, EngineConfig};

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "docgen")]
#[command(version, about = "Compliance document template engine")]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // stdout carries JSON output only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let handle = CatalogHandle::new(config.build_catalog()?);
    let engine = DocumentEngine::from_handle(&handle, config.generation.clone());

    let outcome = commands::run(&engine, args.command)?;
    println!("{}", serde_json::to_string_pretty(&outcome.output)?);

    Ok(if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
