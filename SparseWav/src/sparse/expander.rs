//! Expand a compressed recording into dated files of bounded duration
//!
//! The payload is cut into consecutive intervals of `max_file_duration`
//! seconds. Each interval that contains at least one byte of real audio
//! becomes its own WAV file named after the interval's UTC start time;
//! intervals that are entirely silent produce no file at all.
//!
//! Silence is not written until it is known to belong to a file. While no
//! file is open, silent bytes accumulate in a deferred counter. When real
//! audio arrives the next file is opened and the deferred silence is written
//! ahead of it, so every file still starts exactly on its interval boundary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};

use super::naming::{expanded_file_name, is_compressed_name, output_directory};
use super::options::ExpandOptions;
use super::stream::{
    ProcessingContext, ProgressCallback, ProgressTracker, ValidatedInput, create_output,
    open_input, read_block, rewrite_header, write_zeros,
};
use crate::error::{Error, Result};
use crate::formats::marker::decode_marker;
use crate::formats::wav::{
    HEADER_LENGTH, MAX_DATA_SIZE, WavHeader, format_recording_comment, parse_recording_time,
};

/// Block size the expander reads in
const BLOCK_SIZE: usize = 512;

/// Output is 16-bit mono
const BYTES_PER_SAMPLE: u64 = 2;

/// Outcome of a successful expansion
#[derive(Debug, Clone)]
pub struct ExpandResult {
    /// Files written, in time order. Empty if the recording was all silence.
    pub output_files: Vec<PathBuf>,
    /// Recording start time parsed from the header comment
    pub recording_start: DateTime<Utc>,
    /// Duration of each output file in seconds. Lower than requested only
    /// when the requested duration would not fit a WAV header.
    pub file_duration: u32,
}

/// Expand `input` into files of at most `max_file_duration` seconds.
///
/// Outputs are written beside the input with no prefix.
///
/// # Errors
///
/// See [`expand_with_options`].
pub fn expand<P: AsRef<Path>>(
    input: P,
    max_file_duration: u32,
    progress: ProgressCallback,
) -> Result<ExpandResult> {
    let options = ExpandOptions::new().with_max_file_duration(max_file_duration);
    expand_with_options(input, &options, progress)
}

/// Expand `input` according to `options`.
///
/// Every precondition is checked before any output file is created.
///
/// # Errors
///
/// - [`Error::InvalidDuration`] if the duration is zero
/// - [`Error::InvalidFileName`] if the name has no `T.WAV` marker
/// - input and header errors as for decompression
/// - [`Error::CommentFormat`] if the comment does not open with the recording time
/// - [`Error::InvalidSampleRate`] if the header's sample rate is zero
/// - [`Error::OutputCreate`] or [`Error::Processing`] while writing
pub fn expand_with_options<P: AsRef<Path>>(
    input: P,
    options: &ExpandOptions,
    progress: ProgressCallback,
) -> Result<ExpandResult> {
    let input = input.as_ref();

    if options.max_file_duration == 0 {
        return Err(Error::InvalidDuration);
    }

    if !is_compressed_name(input) {
        return Err(Error::InvalidFileName {
            path: input.to_path_buf(),
        });
    }

    let ValidatedInput {
        mut reader,
        size,
        header,
        first_block,
    } = open_input(input, BLOCK_SIZE)?;

    let recording_start = parse_recording_time(&header.comment)?;
    let (file_duration, bytes_per_file) =
        file_budget(header.wav_format.sample_rate, options.max_file_duration)?;

    tracing::info!(
        "Expanding {} into files of {}s ({} bytes)",
        input.display(),
        file_duration,
        bytes_per_file
    );

    let mut expansion = Expansion::new(
        header,
        recording_start,
        file_duration,
        bytes_per_file,
        output_directory(input, options.output_dir.as_deref()),
        options.prefix.clone(),
    );

    let mut tracker = ProgressTracker::new(progress, size);
    tracker.advance(first_block.len() as u64);

    // Audio between the header and the first block boundary
    expansion.push_input(&first_block[HEADER_LENGTH..])?;

    let mut block = [0u8; BLOCK_SIZE];

    loop {
        let read = read_block(&mut reader, &mut block).processing()?;
        if read == 0 {
            break;
        }

        tracker.advance(read as u64);

        let count = if read == BLOCK_SIZE {
            decode_marker(&block)
        } else {
            0
        };

        if count > 0 {
            expansion.push_blank(u64::from(count) * BLOCK_SIZE as u64)?;
        } else {
            expansion.push_input(&block[..read])?;
        }

        if read < BLOCK_SIZE {
            break;
        }
    }

    let output_files = expansion.finish()?;
    tracker.finish();

    tracing::info!("Expanded into {} file(s)", output_files.len());

    Ok(ExpandResult {
        output_files,
        recording_start,
        file_duration,
    })
}

/// Work out the duration and byte cap of each output file.
///
/// A cap too large for a WAV header is reduced to the longest whole number
/// of seconds that fits.
fn file_budget(sample_rate: u32, max_file_duration: u32) -> Result<(u32, u64)> {
    if sample_rate == 0 {
        return Err(Error::InvalidSampleRate);
    }

    let bytes_per_second = BYTES_PER_SAMPLE * u64::from(sample_rate);
    let requested = bytes_per_second * u64::from(max_file_duration);

    if requested <= u64::from(MAX_DATA_SIZE) {
        return Ok((max_file_duration, requested));
    }

    let duration = u32::try_from(u64::from(MAX_DATA_SIZE) / bytes_per_second)
        .map_err(|_| Error::InvalidDuration)?;
    if duration == 0 {
        return Err(Error::InvalidSampleRate);
    }

    tracing::warn!(
        "{max_file_duration}s at {sample_rate} Hz exceeds the WAV size limit, using {duration}s files"
    );

    Ok((duration, bytes_per_second * u64::from(duration)))
}

/// An output file being filled
struct OutputSession {
    path: PathBuf,
    timestamp: DateTime<Utc>,
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl OutputSession {
    /// Create the file and reserve space for its header.
    fn create(path: PathBuf, timestamp: DateTime<Utc>) -> Result<Self> {
        let mut writer = create_output(&path)?;
        writer.write_all(&[0u8; HEADER_LENGTH]).processing()?;

        tracing::debug!("Opened {}", path.display());

        Ok(Self {
            path,
            timestamp,
            writer,
            bytes_written: 0,
        })
    }

    fn write_blank(&mut self, count: u64) -> Result<()> {
        write_zeros(&mut self.writer, count).processing()?;
        self.bytes_written += count;
        Ok(())
    }

    fn write_input(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data).processing()?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Write the file's real header and close it.
    fn finalize(self, template: &WavHeader) -> Result<PathBuf> {
        let data_size = u32::try_from(self.bytes_written).map_err(|_| Error::OutputTooLarge)?;

        let mut header = template.clone();
        header.update_data_size(data_size);
        header.overwrite_comment(&format_recording_comment(&self.timestamp));

        rewrite_header(self.writer, &header)?;

        tracing::debug!("Closed {} ({} bytes)", self.path.display(), data_size);

        Ok(self.path)
    }
}

/// Where the expansion stands within the current interval
enum State {
    /// No file is open; silence seen so far in this interval is owed to the
    /// next file, if one is opened before the interval ends
    NoFileOpen { deferred_blank: u64 },
    /// A file for this interval is open
    FileOpen(OutputSession),
}

/// Splits a stream of silent and real bytes into per-interval output files
struct Expansion {
    state: State,
    /// Header copied into every output, with sizes and comment replaced
    template: WavHeader,
    /// Start of the current interval
    timestamp: DateTime<Utc>,
    step: TimeDelta,
    bytes_per_file: u64,
    output_dir: PathBuf,
    prefix: Option<String>,
    completed: Vec<PathBuf>,
}

impl Expansion {
    fn new(
        template: WavHeader,
        start: DateTime<Utc>,
        file_duration: u32,
        bytes_per_file: u64,
        output_dir: PathBuf,
        prefix: Option<String>,
    ) -> Self {
        Self {
            state: State::NoFileOpen { deferred_blank: 0 },
            template,
            timestamp: start,
            step: TimeDelta::seconds(i64::from(file_duration)),
            bytes_per_file,
            output_dir,
            prefix,
            completed: Vec::new(),
        }
    }

    /// Account for `count` bytes of silence.
    fn push_blank(&mut self, mut count: u64) -> Result<()> {
        while count > 0 {
            let capacity = self.bytes_per_file;

            match &mut self.state {
                State::FileOpen(session) => {
                    let n = count.min(capacity - session.bytes_written);
                    session.write_blank(n)?;
                    count -= n;
                }
                State::NoFileOpen { deferred_blank } => {
                    let n = count.min(capacity - *deferred_blank);
                    *deferred_blank += n;
                    count -= n;
                }
            }

            self.roll_over_if_full()?;
        }

        Ok(())
    }

    /// Write real audio bytes, opening files as needed.
    fn push_input(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            if let State::NoFileOpen { deferred_blank } = self.state {
                let path = self
                    .output_dir
                    .join(expanded_file_name(self.prefix.as_deref(), &self.timestamp));

                let mut session = OutputSession::create(path, self.timestamp)?;
                session.write_blank(deferred_blank)?;
                self.state = State::FileOpen(session);
            }

            if let State::FileOpen(session) = &mut self.state {
                let room = self.bytes_per_file - session.bytes_written;
                let n = (data.len() as u64).min(room) as usize;
                session.write_input(&data[..n])?;
                data = &data[n..];
            }

            self.roll_over_if_full()?;
        }

        Ok(())
    }

    /// Close the interval if its file, or its deferred silence, is at the cap.
    fn roll_over_if_full(&mut self) -> Result<()> {
        let full = match &self.state {
            State::FileOpen(session) => session.bytes_written >= self.bytes_per_file,
            State::NoFileOpen { deferred_blank } => *deferred_blank >= self.bytes_per_file,
        };

        if !full {
            return Ok(());
        }

        self.close_current()?;
        self.timestamp = self
            .timestamp
            .checked_add_signed(self.step)
            .ok_or(Error::TimestampOutOfRange)?;

        Ok(())
    }

    /// Finalize the open file, if any, and forget deferred silence.
    fn close_current(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, State::NoFileOpen { deferred_blank: 0 });

        if let State::FileOpen(session) = previous {
            let path = session.finalize(&self.template)?;
            self.completed.push(path);
        }

        Ok(())
    }

    /// End of input: finalize whatever is open.
    fn finish(mut self) -> Result<Vec<PathBuf>> {
        self.close_current()?;
        Ok(self.completed)
    }
}
