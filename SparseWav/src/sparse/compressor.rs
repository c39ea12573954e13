//! Reference encoder: replace runs of silent blocks with marker blocks
//!
//! The output of [`compress`] decompresses back to the input byte for byte.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::naming::compressed_path;
use super::options::CompressOptions;
use super::stream::{
    ProcessingContext, ValidatedInput, create_output, open_input, patch_sizes, read_block,
    write_zeros,
};
use crate::error::{Error, Result};
use crate::formats::marker::{decode_marker, encode_marker};
use crate::formats::wav::HEADER_LENGTH;

const BLOCK_SIZE: usize = 512;

/// Outcome of a successful compression
#[derive(Debug, Clone)]
pub struct CompressResult {
    pub output_path: PathBuf,
    /// Bytes saved relative to the input
    pub bytes_removed: u64,
    /// Marker blocks written
    pub marker_count: u64,
}

/// Compress a plain recording into a `T`-marked file.
///
/// # Errors
///
/// - [`Error::NotCompressible`] if the name is not a plain `.WAV` name
/// - input and header errors as for decompression
/// - [`Error::MarkerCollision`] if a data block would be read back as a marker
/// - [`Error::OutputCreate`] or [`Error::Processing`] while writing
pub fn compress<P: AsRef<Path>>(input: P, options: &CompressOptions) -> Result<CompressResult> {
    let input = input.as_ref();
    let output_path = compressed_path(input, options.output_dir.as_deref())?;

    let ValidatedInput {
        mut reader,
        size,
        first_block,
        ..
    } = open_input(input, BLOCK_SIZE)?;

    tracing::info!(
        "Compressing {} -> {}",
        input.display(),
        output_path.display()
    );

    let mut writer = SilenceWriter::new(create_output(&output_path)?, options.min_run.max(1));
    writer.write_data(&first_block)?;

    let mut offset = first_block.len() as u64;
    let mut block = [0u8; BLOCK_SIZE];

    loop {
        let read = read_block(&mut reader, &mut block).processing()?;
        if read == 0 {
            break;
        }

        if read < BLOCK_SIZE {
            writer.write_data(&block[..read])?;
            break;
        }

        if block.iter().all(|&b| b == 0) {
            writer.push_silent_block();
        } else if decode_marker(&block) > 0 {
            return Err(Error::MarkerCollision { offset });
        } else {
            writer.write_data(&block)?;
        }

        offset += BLOCK_SIZE as u64;
    }

    let (file, written, marker_count) = writer.finish()?;

    let data_size =
        u32::try_from(written - HEADER_LENGTH as u64).map_err(|_| Error::OutputTooLarge)?;
    patch_sizes(file, data_size)?;

    let bytes_removed = size - written;
    tracing::info!("Compressed with {marker_count} marker(s), {bytes_removed} bytes removed");

    Ok(CompressResult {
        output_path,
        bytes_removed,
        marker_count,
    })
}

/// Holds back silent blocks until it knows whether they form a long enough run
struct SilenceWriter {
    writer: BufWriter<File>,
    min_run: u32,
    pending_blocks: u64,
    written: u64,
    marker_count: u64,
}

impl SilenceWriter {
    fn new(writer: BufWriter<File>, min_run: u32) -> Self {
        Self {
            writer,
            min_run,
            pending_blocks: 0,
            written: 0,
            marker_count: 0,
        }
    }

    fn push_silent_block(&mut self) {
        self.pending_blocks += 1;
    }

    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        self.flush_run()?;
        self.writer.write_all(data).processing()?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Emit the pending run, as markers if it is long enough.
    fn flush_run(&mut self) -> Result<()> {
        let mut remaining = std::mem::take(&mut self.pending_blocks);

        if remaining < u64::from(self.min_run) {
            let bytes = remaining * BLOCK_SIZE as u64;
            write_zeros(&mut self.writer, bytes).processing()?;
            self.written += bytes;
            return Ok(());
        }

        tracing::debug!("Encoding run of {remaining} silent blocks");

        while remaining > 0 {
            let count = u32::try_from(remaining).unwrap_or(u32::MAX);
            self.writer.write_all(&encode_marker(count)).processing()?;
            self.written += BLOCK_SIZE as u64;
            self.marker_count += 1;
            remaining -= u64::from(count);
        }

        Ok(())
    }

    fn finish(mut self) -> Result<(BufWriter<File>, u64, u64)> {
        self.flush_run()?;
        Ok((self.writer, self.written, self.marker_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::wav::{WavHeader, read_header};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// A recording: header, 24 alignment bytes, then `blocks`
    fn write_recording(path: &Path, blocks: &[[u8; BLOCK_SIZE]]) {
        let data_len = 24 + blocks.len() * BLOCK_SIZE;
        let mut header = WavHeader::new(8000, "Recorded at 00:00:00 01/01/2024", "");
        header.update_data_size(data_len as u32);

        let mut bytes = header.to_bytes().unwrap().to_vec();
        bytes.extend_from_slice(&[3u8; 24]);
        for block in blocks {
            bytes.extend_from_slice(block);
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_compress_replaces_runs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("REC.WAV");
        let loud = [1u8; BLOCK_SIZE];
        let quiet = [0u8; BLOCK_SIZE];
        write_recording(&input, &[loud, quiet, loud, quiet, quiet, quiet, loud]);

        let result = compress(&input, &CompressOptions::default()).unwrap();
        assert_eq!(result.output_path, dir.path().join("RECT.WAV"));
        assert_eq!(result.marker_count, 1);
        assert_eq!(result.bytes_removed, 2 * BLOCK_SIZE as u64);

        let out = std::fs::read(&result.output_path).unwrap();
        let header = read_header(&out).unwrap();
        assert_eq!(u64::from(header.data.size), out.len() as u64 - HEADER_LENGTH as u64);

        // Single silent block kept as data, then the run of three as one marker
        let marker = &out[BLOCK_SIZE * 4..BLOCK_SIZE * 5];
        assert_eq!(decode_marker(marker), 3);
        assert!(out[BLOCK_SIZE * 2..BLOCK_SIZE * 3].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_compress_min_run_one() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("REC.WAV");
        write_recording(&input, &[[1u8; BLOCK_SIZE], [0u8; BLOCK_SIZE]]);

        let result = compress(&input, &CompressOptions::new().with_min_run(0)).unwrap();
        assert_eq!(result.marker_count, 1);
        assert_eq!(result.bytes_removed, 0);
    }

    #[test]
    fn test_compress_rejects_marker_shaped_data() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("REC.WAV");
        write_recording(&input, &[[1u8; BLOCK_SIZE], encode_marker(7)]);

        let err = compress(&input, &CompressOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MarkerCollision { offset: 1024 }));
    }

    #[test]
    fn test_compress_rejects_marked_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("RECT.WAV");
        write_recording(&input, &[]);

        assert!(matches!(
            compress(&input, &CompressOptions::default()),
            Err(Error::NotCompressible { .. })
        ));
    }
}
