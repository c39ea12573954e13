//! Sparse-silence codec operations

mod batch;
mod compressor;
mod decompressor;
mod expander;
mod inspect;
pub mod naming;
mod options;
mod stream;

// Primary public API
pub use decompressor::{DecompressResult, decompress, decompress_with_options};
pub use expander::{ExpandResult, expand, expand_with_options};
pub use stream::ProgressCallback;

// Reference encoder and inspection
pub use compressor::{CompressResult, compress};
pub use inspect::{WavInfo, inspect};

pub use options::{
    CompressOptions, DEFAULT_MAX_FILE_DURATION, DEFAULT_MIN_RUN, DecompressOptions, ExpandOptions,
};

pub use naming::{compressed_path, decompressed_path, expanded_file_name, is_compressed_name};

// Re-export batch operations
pub use batch::{BatchProgress, BatchResult, batch_decompress, batch_expand, find_compressed_files};
