//! Options for decompression, expansion and compression
//!
//! Each operation takes its options by reference so a batch can share one
//! set across files.
//!
//! # Example
//!
//! ```no_run
//! use sparsewav::sparse::ExpandOptions;
//!
//! let options = ExpandOptions::new()
//!     .with_max_file_duration(3600)
//!     .with_prefix(Some("SITE01".to_string()));
//! ```

use std::path::PathBuf;

/// One calendar day, the default cap on an expanded file's duration
pub const DEFAULT_MAX_FILE_DURATION: u32 = 86_400;

/// Shortest run of silent blocks the compressor replaces with a marker
pub const DEFAULT_MIN_RUN: u32 = 2;

/// Options for restoring a compressed file into a single WAV file.
#[derive(Debug, Clone, Default)]
pub struct DecompressOptions {
    /// Directory for the restored file. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
}

impl DecompressOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }
}

/// Options for expanding a compressed file into dated, bounded files.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Longest duration of any output file, in seconds. Must be positive.
    pub max_file_duration: u32,

    /// Text placed before the timestamp in output names (`PREFIX_YYYYMMDD_HHMMSS.WAV`)
    pub prefix: Option<String>,

    /// Directory for the output files. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_file_duration: DEFAULT_MAX_FILE_DURATION,
            prefix: None,
            output_dir: None,
        }
    }
}

impl ExpandOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum duration of each output file in seconds.
    #[must_use]
    pub fn with_max_file_duration(mut self, seconds: u32) -> Self {
        self.max_file_duration = seconds;
        self
    }

    /// Set the file name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }
}

/// Options for compressing a plain recording.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Shortest run of all-zero blocks replaced by a marker. Runs shorter
    /// than this are stored as they are. Values below 1 are treated as 1.
    pub min_run: u32,

    /// Directory for the compressed file. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            min_run: DEFAULT_MIN_RUN,
            output_dir: None,
        }
    }
}

impl CompressOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shortest run of silent blocks to encode.
    #[must_use]
    pub fn with_min_run(mut self, blocks: u32) -> Self {
        self.min_run = blocks;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }
}
