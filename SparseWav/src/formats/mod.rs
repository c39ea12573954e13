//! On-disk formats: the fixed WAVE header and the run-length marker block

pub mod marker;
pub mod wav;

pub use marker::{MARKER_BLOCK_SIZE, decode_marker, encode_marker};
pub use wav::{
    ChunkHeader, HEADER_LENGTH, WavFormat, WavHeader, check_header, read_header, write_header,
};
