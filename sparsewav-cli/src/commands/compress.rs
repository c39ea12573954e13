//! Compress command

use std::path::PathBuf;
use std::time::Instant;

use sparsewav::sparse::{CompressOptions, compress};

use crate::progress::{PACKAGE, print_done, print_step};

pub fn execute(
    sources: &[PathBuf],
    min_run: Option<u32>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut options = CompressOptions::new().with_output_dir(output_dir);
    if let Some(blocks) = min_run {
        options = options.with_min_run(blocks);
    }

    let started = Instant::now();
    let total = sources.len();
    let mut failed = 0usize;

    for (index, source) in sources.iter().enumerate() {
        print_step(index + 1, total, &PACKAGE, &format!("Compressing {}", source.display()));

        match compress(source, &options) {
            Ok(result) => println!(
                "  {} ({} marker(s), {} bytes removed)",
                result.output_path.display(),
                result.marker_count,
                result.bytes_removed
            ),
            Err(e) => {
                failed += 1;
                println!("  Failed: {e}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} file(s) failed");
    }

    print_done(started.elapsed());
    Ok(())
}
