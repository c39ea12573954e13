//! Fixed-layout WAVE header
//!
//! Recorder files start with a 488-byte header made of a fixed chunk
//! sequence: `RIFF`/`WAVE`, a 16-byte `fmt ` chunk, a `LIST`/`INFO` group
//! holding a 384-byte `ICMT` comment and a 32-byte `IART` artist, then the
//! `data` chunk header. The layout never varies, so fields are read at fixed
//! offsets rather than by walking chunks.
//!
//! ## Layout
//!
//! | Offset | Field                      |
//! |--------|----------------------------|
//! | 0      | `RIFF` + size              |
//! | 8      | `WAVE`                     |
//! | 12     | `fmt ` + size + format     |
//! | 36     | `LIST` + size + `INFO`     |
//! | 48     | `ICMT` + size + comment    |
//! | 440    | `IART` + size + artist     |
//! | 480    | `data` + size              |
//! | 488    | payload                    |

mod comment;
mod header;

pub use comment::{COMMENT_PREFIX, format_recording_comment, parse_recording_time};
pub use header::{check_header, read_header, write_header};

use serde::Serialize;

/// Length of the fixed header in bytes
pub const HEADER_LENGTH: usize = 488;

/// Width of the `ICMT` comment field
pub const COMMENT_LENGTH: usize = 384;

/// Width of the `IART` artist field
pub const ARTIST_LENGTH: usize = 32;

/// Largest payload whose RIFF size still fits in a `u32`
pub const MAX_DATA_SIZE: u32 = u32::MAX - HEADER_LENGTH as u32;

pub(crate) const TAG_LENGTH: usize = 4;
pub(crate) const RIFF_ID: &str = "RIFF";
pub(crate) const WAVE_ID: &str = "WAVE";
pub(crate) const FMT_ID: &str = "fmt ";
pub(crate) const LIST_ID: &str = "LIST";
pub(crate) const INFO_ID: &str = "INFO";
pub(crate) const ICMT_ID: &str = "ICMT";
pub(crate) const IART_ID: &str = "IART";
pub(crate) const DATA_ID: &str = "data";

/// Size of the `fmt ` chunk body
const FMT_CHUNK_SIZE: u32 = 16;

/// Size of the `LIST` chunk body: `INFO` plus the comment and artist chunks
const LIST_CHUNK_SIZE: u32 = (TAG_LENGTH + 8 + COMMENT_LENGTH + 8 + ARTIST_LENGTH) as u32;

/// A chunk tag and its declared size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkHeader {
    pub id: String,
    pub size: u32,
}

impl ChunkHeader {
    fn new(id: &str, size: u32) -> Self {
        Self {
            id: id.to_string(),
            size,
        }
    }
}

/// Body of the `fmt ` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WavFormat {
    /// Format code (1 = PCM)
    pub format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// In-memory copy of the fixed 488-byte header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WavHeader {
    pub riff: ChunkHeader,
    /// RIFF form type, `"WAVE"` for valid files
    pub format: String,
    pub fmt: ChunkHeader,
    pub wav_format: WavFormat,
    pub list: ChunkHeader,
    /// LIST type, `"INFO"` for valid files
    pub info: String,
    pub icmt: ChunkHeader,
    /// Comment text with trailing NUL bytes removed
    pub comment: String,
    pub iart: ChunkHeader,
    /// Artist text with trailing NUL bytes removed
    pub artist: String,
    pub data: ChunkHeader,
}

impl WavHeader {
    /// Build a 16-bit mono PCM header with an empty payload.
    #[must_use]
    pub fn new(sample_rate: u32, comment: &str, artist: &str) -> Self {
        let mut header = Self {
            riff: ChunkHeader::new(RIFF_ID, 0),
            format: WAVE_ID.to_string(),
            fmt: ChunkHeader::new(FMT_ID, FMT_CHUNK_SIZE),
            wav_format: WavFormat {
                format: 1,
                channels: 1,
                sample_rate,
                byte_rate: sample_rate.saturating_mul(2),
                block_align: 2,
                bits_per_sample: 16,
            },
            list: ChunkHeader::new(LIST_ID, LIST_CHUNK_SIZE),
            info: INFO_ID.to_string(),
            icmt: ChunkHeader::new(ICMT_ID, COMMENT_LENGTH as u32),
            comment: truncate_to_width(comment, COMMENT_LENGTH),
            iart: ChunkHeader::new(IART_ID, ARTIST_LENGTH as u32),
            artist: truncate_to_width(artist, ARTIST_LENGTH),
            data: ChunkHeader::new(DATA_ID, 0),
        };
        header.update_data_size(0);
        header
    }

    /// Set the payload length, recomputing the RIFF size to match.
    ///
    /// Sizes above [`MAX_DATA_SIZE`] cannot be described by the header; the
    /// RIFF size saturates in that case.
    pub fn update_data_size(&mut self, data_size: u32) {
        self.data.size = data_size;
        self.riff.size = data_size.saturating_add(HEADER_LENGTH as u32 - 8);
    }

    /// Replace the start of the comment, keeping anything past the new text.
    pub fn overwrite_comment(&mut self, text: &str) {
        let replacement = &text.as_bytes()[..text.len().min(COMMENT_LENGTH)];

        let mut bytes = self.comment.as_bytes().to_vec();
        if bytes.len() < replacement.len() {
            bytes.resize(replacement.len(), 0);
        }
        bytes[..replacement.len()].copy_from_slice(replacement);

        self.comment = String::from_utf8_lossy(&bytes).into_owned();
    }

    /// Serialize into a fresh header-sized buffer.
    ///
    /// # Errors
    /// Returns an error only if the header cannot be written, which does not
    /// happen for a buffer of [`HEADER_LENGTH`] bytes.
    pub fn to_bytes(&self) -> crate::Result<[u8; HEADER_LENGTH]> {
        let mut buffer = [0u8; HEADER_LENGTH];
        write_header(&mut buffer, self)?;
        Ok(buffer)
    }

    /// Duration of the payload in seconds, if the byte rate is known.
    #[must_use]
    pub fn duration_secs(&self) -> Option<f64> {
        (self.wav_format.byte_rate > 0)
            .then(|| f64::from(self.data.size) / f64::from(self.wav_format.byte_rate))
    }
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let bytes = &text.as_bytes()[..text.len().min(width)];
    String::from_utf8_lossy(bytes).into_owned()
}
