//! # SparseWav
//!
//! Codec for WAV recordings whose long silent stretches have been replaced
//! by run-length marker blocks.
//!
//! Compressed files carry a `T` before their extension (`REC001T.WAV`). They
//! can be restored into one file, or expanded into a series of files of
//! bounded duration named after their UTC start time, with stretches of
//! pure silence left out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sparsewav::sparse::{decompress, expand};
//!
//! // REC001T.WAV -> REC001.WAV
//! let restored = decompress("REC001T.WAV")?;
//! println!("{} bytes of silence restored", restored.bytes_added);
//!
//! // One file per hour of recording that is not entirely silent
//! let expanded = expand("REC001T.WAV", 3600, &|percent| println!("{percent}%"))?;
//! println!("{} files written", expanded.output_files.len());
//! # Ok::<(), sparsewav::Error>(())
//! ```

pub mod error;
pub mod formats;
pub mod sparse;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::{WavHeader, decode_marker, encode_marker, read_header};

    pub use crate::sparse::{
        CompressOptions, DecompressOptions, ExpandOptions, ProgressCallback, compress, decompress,
        decompress_with_options, expand, expand_with_options, inspect,
    };

    // Batch operations
    pub use crate::sparse::{
        BatchProgress, BatchResult, batch_decompress, batch_expand, find_compressed_files,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
