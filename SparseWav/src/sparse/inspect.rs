//! Header and marker summary of a recorder file

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::naming::is_compressed_name;
use super::stream::{ProcessingContext, ValidatedInput, open_input, read_block};
use crate::error::Result;
use crate::formats::marker::decode_marker;
use crate::formats::wav::{WavHeader, parse_recording_time};

const BLOCK_SIZE: usize = 512;

/// What [`inspect`] found in a file
#[derive(Debug, Clone, Serialize)]
pub struct WavInfo {
    pub path: PathBuf,
    pub file_size: u64,
    /// Whether the name carries the `T.WAV` marker
    pub compressed: bool,
    pub header: WavHeader,
    /// Recording start parsed from the comment, if it has one
    pub recording_start: Option<DateTime<Utc>>,
    /// Marker blocks in the payload. Always zero for uncompressed names.
    pub marker_count: u64,
    /// Payload size once every marker is expanded
    pub restored_data_size: u64,
    /// Restored payload duration in seconds
    pub duration_secs: Option<f64>,
}

/// Read and validate `path`, scanning the payload for markers if the name
/// says it is compressed.
///
/// # Errors
///
/// Input and header validation errors as for decompression, or
/// [`Error::Processing`] if the payload cannot be read.
///
/// [`Error::Processing`]: crate::Error::Processing
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let path = path.as_ref();
    let compressed = is_compressed_name(path);

    let ValidatedInput {
        mut reader,
        size,
        header,
        ..
    } = open_input(path, BLOCK_SIZE)?;

    let mut marker_count = 0u64;
    let mut restored_data_size = u64::from(header.data.size);

    if compressed {
        let mut block = [0u8; BLOCK_SIZE];
        while read_block(&mut reader, &mut block).processing()? == BLOCK_SIZE {
            let count = decode_marker(&block);
            if count > 0 {
                marker_count += 1;
                restored_data_size += (u64::from(count) - 1) * BLOCK_SIZE as u64;
            }
        }
    }

    let byte_rate = header.wav_format.byte_rate;
    let duration_secs = (byte_rate > 0).then(|| restored_data_size as f64 / f64::from(byte_rate));

    Ok(WavInfo {
        path: path.to_path_buf(),
        file_size: size,
        compressed,
        recording_start: parse_recording_time(&header.comment).ok(),
        header,
        marker_count,
        restored_data_size,
        duration_secs,
    })
}
