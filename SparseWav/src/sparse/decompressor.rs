//! Restore a compressed recording into a single WAV file
//!
//! Every marker block is replaced by the run of silent blocks it stands for;
//! every other block is copied as it is. The header is copied up front and
//! its size fields are patched once the payload has been written.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::naming::decompressed_path;
use super::options::DecompressOptions;
use super::stream::{
    ProcessingContext, ProgressCallback, ProgressTracker, ValidatedInput, create_output,
    open_input, patch_sizes, read_block, write_zeros,
};
use crate::error::{Error, Result};
use crate::formats::marker::decode_marker;
use crate::formats::wav::MAX_DATA_SIZE;

/// Block size the decompressor reads in
const BLOCK_SIZE: usize = 512;

/// Outcome of a successful decompression
#[derive(Debug, Clone)]
pub struct DecompressResult {
    /// The restored file
    pub output_path: PathBuf,
    /// Bytes of silence inserted beyond the size of the input
    pub bytes_added: u64,
    /// Number of marker blocks expanded
    pub marker_count: u64,
}

/// Decompress `input` next to itself, without progress reporting.
///
/// # Errors
///
/// See [`decompress_with_options`].
pub fn decompress<P: AsRef<Path>>(input: P) -> Result<DecompressResult> {
    decompress_with_options(input, &DecompressOptions::default(), &|_| {})
}

/// Decompress `input`, reporting progress at each 10% of input consumed.
///
/// The output name is derived before anything is opened, and the header is
/// validated before the output file is created, so a naming or header
/// failure leaves nothing on disk. A failure while streaming leaves the
/// partial output in place.
///
/// # Errors
///
/// - [`Error::InvalidFileName`] if the name has no `T.WAV` marker
/// - [`Error::InputOpen`], [`Error::InputStat`], [`Error::EmptyInput`],
///   [`Error::InputTooSmall`] or [`Error::HeaderRead`] for an unreadable input
/// - any header validation error from [`check_header`]
/// - [`Error::OutputCreate`] if the output cannot be created
/// - [`Error::OutputTooLarge`] if the restored payload would not fit a WAV header
/// - [`Error::Processing`] for IO failures while streaming
///
/// [`check_header`]: crate::formats::wav::check_header
pub fn decompress_with_options<P: AsRef<Path>>(
    input: P,
    options: &DecompressOptions,
    progress: ProgressCallback,
) -> Result<DecompressResult> {
    let input = input.as_ref();
    let output_path = decompressed_path(input, options.output_dir.as_deref())?;

    let ValidatedInput {
        mut reader,
        size,
        header,
        first_block,
    } = open_input(input, BLOCK_SIZE)?;

    tracing::info!(
        "Decompressing {} -> {}",
        input.display(),
        output_path.display()
    );

    let mut writer = create_output(&output_path)?;
    writer.write_all(&first_block).processing()?;

    let mut tracker = ProgressTracker::new(progress, size);
    tracker.advance(first_block.len() as u64);

    let original_data_size = u64::from(header.data.size);
    let mut bytes_added = 0u64;
    let mut marker_count = 0u64;
    let mut block = [0u8; BLOCK_SIZE];

    loop {
        let read = read_block(&mut reader, &mut block).processing()?;
        if read == 0 {
            break;
        }

        tracker.advance(read as u64);

        // A short final block is never a marker candidate
        let count = if read == BLOCK_SIZE {
            decode_marker(&block)
        } else {
            0
        };

        if count == 0 {
            writer.write_all(&block[..read]).processing()?;
        } else {
            let inserted = (u64::from(count) - 1) * BLOCK_SIZE as u64;
            if original_data_size + bytes_added + inserted > u64::from(MAX_DATA_SIZE) {
                return Err(Error::OutputTooLarge);
            }

            tracing::debug!("Expanding marker: {count} silent blocks");
            write_zeros(&mut writer, u64::from(count) * BLOCK_SIZE as u64).processing()?;

            bytes_added += inserted;
            marker_count += 1;
        }

        if read < BLOCK_SIZE {
            break;
        }
    }

    let data_size =
        u32::try_from(original_data_size + bytes_added).map_err(|_| Error::OutputTooLarge)?;
    patch_sizes(writer, data_size)?;

    tracker.finish();

    tracing::info!(
        "Decompressed {} marker(s), {} bytes of silence restored",
        marker_count,
        bytes_added
    );

    Ok(DecompressResult {
        output_path,
        bytes_added,
        marker_count,
    })
}
