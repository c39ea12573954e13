//! Expand command

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use sparsewav::sparse::{ExpandOptions, batch_expand, expand_with_options};

use super::{collect_compressed, report_batch, short_name};
use crate::progress::{SCISSORS, percent_bar, print_done, print_step, simple_bar};

pub fn execute(
    sources: &[PathBuf],
    max_duration: Option<u32>,
    prefix: Option<String>,
    output_dir: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let files = collect_compressed(sources);

    let mut options = ExpandOptions::new()
        .with_prefix(prefix)
        .with_output_dir(output_dir);
    if let Some(seconds) = max_duration {
        options = options.with_max_file_duration(seconds);
    }

    let started = Instant::now();

    match files.as_slice() {
        [] => return Ok(()),
        [file] => {
            print_step(
                1,
                1,
                &SCISSORS,
                &format!(
                    "Expanding {} into files of up to {}s",
                    file.display(),
                    options.max_file_duration
                ),
            );

            let pb = percent_bar(&short_name(file), quiet);
            let result =
                expand_with_options(file, &options, &|percent| pb.set_position(u64::from(percent)));
            pb.finish_and_clear();

            let result = result?;
            println!(
                "Recording started {}",
                result.recording_start.format("%H:%M:%S %d/%m/%Y UTC")
            );
            if result.output_files.is_empty() {
                println!("Recording is entirely silent, no files written");
            }
            for path in &result.output_files {
                println!("  {}", path.display());
            }
        }
        files => {
            println!("Found {} compressed files", files.len());

            let pb = simple_bar(files.len() as u64, "Expanding", quiet);
            let cancel = AtomicBool::new(false);
            let result = batch_expand(
                files,
                &options,
                |progress| {
                    pb.set_position(progress.current as u64);
                    if let Some(ref name) = progress.current_file {
                        pb.set_message(name.clone());
                    }
                },
                &cancel,
            );
            pb.finish_and_clear();

            report_batch("Expansion", &result)?;
        }
    }

    print_done(started.elapsed());
    Ok(())
}
