use clap::Subcommand;
use std::path::{Path, PathBuf};

use sparsewav::sparse::{BatchResult, find_compressed_files};

use crate::config::Config;

pub mod compress;
pub mod decompress;
pub mod expand;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Restore compressed recordings (NAMET.WAV -> NAME.WAV)
    Decompress {
        /// Compressed files, or directories to search for them
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Hide progress bars
        #[arg(short, long)]
        quiet: bool,
    },

    /// Expand compressed recordings into dated files, skipping silent intervals
    Expand {
        /// Compressed files, or directories to search for them
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Maximum duration of each output file in seconds [default: 86400]
        #[arg(short = 'd', long = "max-duration", value_name = "SECONDS")]
        max_duration: Option<u32>,

        /// Prefix placed before the timestamp in output file names
        #[arg(short, long)]
        prefix: Option<String>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Hide progress bars
        #[arg(short, long)]
        quiet: bool,
    },

    /// Compress plain recordings (NAME.WAV -> NAMET.WAV)
    Compress {
        /// Plain recorder files
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Shortest run of silent 512-byte blocks to replace [default: 2]
        #[arg(long, value_name = "BLOCKS")]
        min_run: Option<u32>,
    },

    /// Show the header of a recorder file
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Commands::Decompress {
                sources,
                output_dir,
                quiet,
            } => {
                let output_dir = output_dir
                    .clone()
                    .or_else(|| config.decompress.output_dir.clone());
                decompress::execute(sources, output_dir, *quiet)
            }
            Commands::Expand {
                sources,
                max_duration,
                prefix,
                output_dir,
                quiet,
            } => {
                let settings = &config.expand;
                expand::execute(
                    sources,
                    max_duration.or(settings.max_file_duration),
                    prefix.clone().or_else(|| settings.prefix.clone()),
                    output_dir.clone().or_else(|| settings.output_dir.clone()),
                    *quiet,
                )
            }
            Commands::Compress {
                sources,
                output_dir,
                min_run,
            } => {
                let settings = &config.compress;
                compress::execute(
                    sources,
                    min_run.or(settings.min_run),
                    output_dir.clone().or_else(|| settings.output_dir.clone()),
                )
            }
            Commands::Inspect { file, json } => inspect::execute(file, *json),
        }
    }
}

/// Expand directories into the compressed files beneath them.
fn collect_compressed(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for source in sources {
        if source.is_dir() {
            let found = find_compressed_files(source);
            if found.is_empty() {
                println!("No compressed files found in: {}", source.display());
            }
            files.extend(found);
        } else {
            files.push(source.clone());
        }
    }

    files
}

/// Print a batch summary, failing if any file failed.
fn report_batch(verb: &str, result: &BatchResult) -> anyhow::Result<()> {
    println!();
    println!("{verb} complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
        anyhow::bail!("{} of {} file(s) failed", result.fail_count, result.results.len());
    }

    Ok(())
}

/// Last path component, for progress messages
fn short_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
