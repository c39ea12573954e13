use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod progress;

use commands::Commands;
use config::Config;

#[derive(Parser)]
#[command(name = "sparsewav")]
#[command(version = sparsewav::VERSION)]
#[command(about = "Restore and split recordings compressed with silence markers", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/sparsewav/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Default to warnings; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    cli.command.execute(&config)?;

    Ok(())
}
