//! Decompress command

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use sparsewav::sparse::{DecompressOptions, batch_decompress, decompress_with_options};

use super::{collect_compressed, report_batch, short_name};
use crate::progress::{SPEAKER, percent_bar, print_done, print_step, simple_bar};

pub fn execute(
    sources: &[PathBuf],
    output_dir: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let files = collect_compressed(sources);
    let options = DecompressOptions::new().with_output_dir(output_dir);
    let started = Instant::now();

    match files.as_slice() {
        [] => return Ok(()),
        [file] => {
            print_step(1, 1, &SPEAKER, &format!("Decompressing {}", file.display()));

            let pb = percent_bar(&short_name(file), quiet);
            let result = decompress_with_options(file, &options, &|percent| {
                pb.set_position(u64::from(percent));
            });
            pb.finish_and_clear();

            let result = result?;
            println!(
                "Restored {} ({} marker(s), {} bytes of silence)",
                result.output_path.display(),
                result.marker_count,
                result.bytes_added
            );
        }
        files => {
            println!("Found {} compressed files", files.len());

            let pb = simple_bar(files.len() as u64, "Decompressing", quiet);
            let cancel = AtomicBool::new(false);
            let result = batch_decompress(
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

            report_batch("Decompression", &result)?;
        }
    }

    print_done(started.elapsed());
    Ok(())
}
