//! Error types for `SparseWav`
//!
//! The `Display` text of each variant is the message shown to the user, so
//! the header and naming errors read as full sentences.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `SparseWav` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Naming Errors ====================
    /// The input file name does not carry the compressed-file marker.
    #[error("File name is incorrect: {} does not contain T.WAV.", .path.display())]
    InvalidFileName {
        /// The offending input path.
        path: PathBuf,
    },

    /// The input file is not a plain `.WAV` file that can be compressed.
    #[error("File name is incorrect: {} is not an uncompressed .WAV file.", .path.display())]
    NotCompressible {
        /// The offending input path.
        path: PathBuf,
    },

    // ==================== IO Errors ====================
    /// The input file could not be opened.
    #[error("Could not open input file: {source}")]
    InputOpen {
        /// The input path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input file size could not be read.
    #[error("Could not read input file size: {source}")]
    InputStat {
        /// The input path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input file is empty.
    #[error("Input file has zero size.")]
    EmptyInput,

    /// The input file is shorter than the fixed header.
    #[error("Input file is too small to contain a WAV header.")]
    InputTooSmall,

    /// The header block could not be read from the input file.
    #[error("Could not read the input file header: {0}")]
    HeaderRead(#[source] std::io::Error),

    /// The output file could not be created.
    #[error("Could not open output file {}: {source}", .path.display())]
    OutputCreate {
        /// The output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// IO error outside the streaming loop.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Format Errors ====================
    /// The header does not start with a RIFF tag.
    #[error("Could not find RIFF chunk in the input file.")]
    MissingRiff,

    /// The RIFF chunk size does not match the file size.
    #[error("RIFF chunk file size is incorrect.")]
    RiffSizeMismatch,

    /// The RIFF form type is not WAVE.
    #[error("Could not find WAVE format indicator in the input file.")]
    MissingWave,

    /// The `fmt ` chunk is missing.
    #[error("Could not find FMT chunk in the input file.")]
    MissingFmt,

    /// The `ICMT` comment chunk is missing.
    #[error("Could not find comment in the input file.")]
    MissingComment,

    /// The `data` chunk is missing.
    #[error("Could not find DATA chunk in the input file.")]
    MissingData,

    /// The data chunk size does not match the file size.
    #[error("DATA chunk file size is incorrect.")]
    DataSizeMismatch,

    /// The header comment does not start with a recording timestamp.
    #[error("Cannot find recording start time in the header comment.")]
    CommentFormat,

    /// The header declares a sample rate of zero.
    #[error("Sample rate in the header is zero.")]
    InvalidSampleRate,

    /// The restored payload would not fit the 32-bit RIFF size fields.
    #[error("Decompressed file would exceed the maximum WAV file size.")]
    OutputTooLarge,

    /// A data block would be read back as a compression marker.
    #[error("Data block at offset {offset} looks like a compression marker and cannot be stored.")]
    MarkerCollision {
        /// Byte offset of the block in the input file.
        offset: u64,
    },

    // ==================== Parameter Errors ====================
    /// The maximum file duration is not a positive integer.
    #[error("Maximum file duration must be a positive integer.")]
    InvalidDuration,

    /// An output file timestamp fell outside the representable range.
    #[error("Output file timestamp is out of range.")]
    TimestampOutOfRange,

    // ==================== Processing Errors ====================
    /// IO failure while streaming blocks between input and output.
    #[error("Error occurred while processing file: {0}")]
    Processing(#[source] std::io::Error),
}

/// A specialized Result type for `SparseWav` operations.
pub type Result<T> = std::result::Result<T, Error>;
