//! Header reading, writing and validation

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{
    ARTIST_LENGTH, COMMENT_LENGTH, ChunkHeader, DATA_ID, FMT_ID, HEADER_LENGTH, ICMT_ID, RIFF_ID,
    TAG_LENGTH, WAVE_ID, WavFormat, WavHeader,
};
use crate::error::{Error, Result};

/// Parse the fixed header from the start of `bytes`.
///
/// Only the first [`HEADER_LENGTH`] bytes are looked at. No validation is
/// done here; run [`check_header`] against the file size afterwards.
///
/// # Errors
///
/// Returns [`Error::InputTooSmall`] if fewer than [`HEADER_LENGTH`] bytes are given.
///
/// [`Error::InputTooSmall`]: crate::Error::InputTooSmall
pub fn read_header(bytes: &[u8]) -> Result<WavHeader> {
    if bytes.len() < HEADER_LENGTH {
        return Err(Error::InputTooSmall);
    }

    let mut cursor = Cursor::new(&bytes[..HEADER_LENGTH]);

    let riff = read_chunk(&mut cursor)?;
    let format = read_tag(&mut cursor)?;

    let fmt = read_chunk(&mut cursor)?;
    let wav_format = WavFormat {
        format: cursor.read_u16::<LittleEndian>()?,
        channels: cursor.read_u16::<LittleEndian>()?,
        sample_rate: cursor.read_u32::<LittleEndian>()?,
        byte_rate: cursor.read_u32::<LittleEndian>()?,
        block_align: cursor.read_u16::<LittleEndian>()?,
        bits_per_sample: cursor.read_u16::<LittleEndian>()?,
    };

    let list = read_chunk(&mut cursor)?;
    let info = read_tag(&mut cursor)?;

    let icmt = read_chunk(&mut cursor)?;
    let comment = read_text(&mut cursor, COMMENT_LENGTH)?;

    let iart = read_chunk(&mut cursor)?;
    let artist = read_text(&mut cursor, ARTIST_LENGTH)?;

    let data = read_chunk(&mut cursor)?;

    Ok(WavHeader {
        riff,
        format,
        fmt,
        wav_format,
        list,
        info,
        icmt,
        comment,
        iart,
        artist,
        data,
    })
}

/// Serialize `header` over the first [`HEADER_LENGTH`] bytes of `buffer`.
///
/// String fields are zero-filled to their full width before the text is
/// written, so a shorter replacement never leaves stale bytes behind.
/// Bytes past the header are left untouched.
///
/// # Errors
///
/// Returns [`Error::Io`] if `buffer` is shorter than [`HEADER_LENGTH`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_header(buffer: &mut [u8], header: &WavHeader) -> Result<()> {
    let mut cursor = Cursor::new(buffer);

    write_chunk(&mut cursor, &header.riff)?;
    write_tag(&mut cursor, &header.format)?;

    write_chunk(&mut cursor, &header.fmt)?;
    let format = &header.wav_format;
    cursor.write_u16::<LittleEndian>(format.format)?;
    cursor.write_u16::<LittleEndian>(format.channels)?;
    cursor.write_u32::<LittleEndian>(format.sample_rate)?;
    cursor.write_u32::<LittleEndian>(format.byte_rate)?;
    cursor.write_u16::<LittleEndian>(format.block_align)?;
    cursor.write_u16::<LittleEndian>(format.bits_per_sample)?;

    write_chunk(&mut cursor, &header.list)?;
    write_tag(&mut cursor, &header.info)?;

    write_chunk(&mut cursor, &header.icmt)?;
    write_text(&mut cursor, &header.comment, COMMENT_LENGTH)?;

    write_chunk(&mut cursor, &header.iart)?;
    write_text(&mut cursor, &header.artist, ARTIST_LENGTH)?;

    write_chunk(&mut cursor, &header.data)?;

    Ok(())
}

/// Validate a header against the size of the file it came from.
///
/// Checks run in a fixed order and the first failure is returned.
///
/// # Errors
///
/// One of [`Error::MissingRiff`], [`Error::RiffSizeMismatch`],
/// [`Error::MissingWave`], [`Error::MissingFmt`], [`Error::MissingComment`],
/// [`Error::MissingData`] or [`Error::DataSizeMismatch`].
///
/// [`Error::MissingRiff`]: crate::Error::MissingRiff
/// [`Error::RiffSizeMismatch`]: crate::Error::RiffSizeMismatch
/// [`Error::MissingWave`]: crate::Error::MissingWave
/// [`Error::MissingFmt`]: crate::Error::MissingFmt
/// [`Error::MissingComment`]: crate::Error::MissingComment
/// [`Error::MissingData`]: crate::Error::MissingData
/// [`Error::DataSizeMismatch`]: crate::Error::DataSizeMismatch
pub fn check_header(header: &WavHeader, file_size: u64) -> Result<()> {
    if header.riff.id != RIFF_ID {
        return Err(Error::MissingRiff);
    }

    if u64::from(header.riff.size) + 8 != file_size {
        return Err(Error::RiffSizeMismatch);
    }

    if header.format != WAVE_ID {
        return Err(Error::MissingWave);
    }

    if header.fmt.id != FMT_ID {
        return Err(Error::MissingFmt);
    }

    if header.icmt.id != ICMT_ID {
        return Err(Error::MissingComment);
    }

    if header.data.id != DATA_ID {
        return Err(Error::MissingData);
    }

    if u64::from(header.data.size) + HEADER_LENGTH as u64 != file_size {
        return Err(Error::DataSizeMismatch);
    }

    Ok(())
}

fn read_tag<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut tag = [0u8; TAG_LENGTH];
    reader.read_exact(&mut tag)?;
    Ok(String::from_utf8_lossy(&tag).into_owned())
}

fn read_chunk<R: Read>(reader: &mut R) -> std::io::Result<ChunkHeader> {
    let id = read_tag(reader)?;
    let size = reader.read_u32::<LittleEndian>()?;
    Ok(ChunkHeader { id, size })
}

/// Read a fixed-width, NUL-padded text field
fn read_text<R: Read>(reader: &mut R, width: usize) -> std::io::Result<String> {
    let mut bytes = vec![0u8; width];
    reader.read_exact(&mut bytes)?;

    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

fn write_tag<W: Write>(writer: &mut W, tag: &str) -> std::io::Result<()> {
    write_text(writer, tag, TAG_LENGTH)
}

fn write_chunk<W: Write>(writer: &mut W, chunk: &ChunkHeader) -> std::io::Result<()> {
    write_tag(writer, &chunk.id)?;
    writer.write_u32::<LittleEndian>(chunk.size)
}

/// Write `text` into a zero-filled field of `width` bytes, truncating if needed
fn write_text<W: Write>(writer: &mut W, text: &str, width: usize) -> std::io::Result<()> {
    let mut field = vec![0u8; width];
    let len = text.len().min(width);
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COMMENT: &str = "Recorded at 12:34:56 01/02/2023 (UTC) by AudioMoth 24F3190361DA5A8F";

    fn sample_header(data_size: u32) -> WavHeader {
        let mut header = WavHeader::new(48_000, COMMENT, "AudioMoth 24F3190361DA5A8F");
        header.update_data_size(data_size);
        header
    }

    fn file_size(data_size: u32) -> u64 {
        HEADER_LENGTH as u64 + u64::from(data_size)
    }

    #[test]
    fn test_new_header_layout() {
        let bytes = sample_header(0).to_bytes().unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 480);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[36..40], b"LIST");
        assert_eq!(&bytes[44..48], b"INFO");
        assert_eq!(&bytes[48..52], b"ICMT");
        assert_eq!(&bytes[56..56 + COMMENT.len()], COMMENT.as_bytes());
        assert_eq!(&bytes[440..444], b"IART");
        assert_eq!(&bytes[480..484], b"data");
        assert_eq!(u32::from_le_bytes(bytes[484..488].try_into().unwrap()), 0);
    }

    #[test]
    fn test_read_write_round_trip() {
        let header = sample_header(1024);
        let bytes = header.to_bytes().unwrap();
        let parsed = read_header(&bytes).unwrap();

        assert_eq!(parsed, header);
        assert_eq!(parsed.wav_format.sample_rate, 48_000);
        assert_eq!(parsed.comment, COMMENT);
    }

    #[test]
    fn test_read_header_too_short() {
        let bytes = vec![0u8; HEADER_LENGTH - 1];
        assert!(matches!(read_header(&bytes), Err(Error::InputTooSmall)));
    }

    #[test]
    fn test_write_header_leaves_trailing_bytes() {
        let mut buffer = vec![0xAAu8; HEADER_LENGTH + 24];
        write_header(&mut buffer, &sample_header(24)).unwrap();
        assert!(buffer[HEADER_LENGTH..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_write_header_clears_stale_text() {
        let mut buffer = sample_header(0).to_bytes().unwrap();

        let mut shorter = sample_header(0);
        shorter.comment = "short".to_string();
        write_header(&mut buffer, &shorter).unwrap();

        assert_eq!(read_header(&buffer).unwrap().comment, "short");
        assert!(buffer[56 + 5..56 + COMMENT_LENGTH].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_check_header_accepts_valid() {
        let header = sample_header(2048);
        check_header(&header, file_size(2048)).unwrap();
    }

    #[test]
    fn test_check_header_rejections() {
        let size = file_size(512);

        let mut header = sample_header(512);
        header.riff.id = "RIFX".to_string();
        assert!(matches!(check_header(&header, size), Err(Error::MissingRiff)));

        let header = sample_header(512);
        assert!(matches!(check_header(&header, size + 1), Err(Error::RiffSizeMismatch)));

        let mut header = sample_header(512);
        header.format = "AVI ".to_string();
        assert!(matches!(check_header(&header, size), Err(Error::MissingWave)));

        let mut header = sample_header(512);
        header.fmt.id = "fmt\0".to_string();
        assert!(matches!(check_header(&header, size), Err(Error::MissingFmt)));

        let mut header = sample_header(512);
        header.icmt.id = "INAM".to_string();
        assert!(matches!(check_header(&header, size), Err(Error::MissingComment)));

        let mut header = sample_header(512);
        header.data.id = "junk".to_string();
        assert!(matches!(check_header(&header, size), Err(Error::MissingData)));

        let mut header = sample_header(512);
        header.data.size = 500;
        assert!(matches!(check_header(&header, size), Err(Error::DataSizeMismatch)));
    }

    #[test]
    fn test_check_header_messages() {
        let mut header = sample_header(0);
        header.data.id = "DATA".to_string();
        let err = check_header(&header, file_size(0)).unwrap_err();
        assert_eq!(err.to_string(), "Could not find DATA chunk in the input file.");
    }

    #[test]
    fn test_update_data_size() {
        let mut header = sample_header(0);
        header.update_data_size(10_000);
        assert_eq!(header.data.size, 10_000);
        assert_eq!(header.riff.size, 10_000 + HEADER_LENGTH as u32 - 8);
        check_header(&header, file_size(10_000)).unwrap();
    }

    #[test]
    fn test_overwrite_comment_keeps_tail() {
        let mut header = sample_header(0);
        header.overwrite_comment("Recorded at 13:34:56 01/02/2023");
        assert_eq!(
            header.comment,
            "Recorded at 13:34:56 01/02/2023 (UTC) by AudioMoth 24F3190361DA5A8F"
        );
    }

    #[test]
    fn test_overwrite_comment_longer_than_existing() {
        let mut header = sample_header(0);
        header.comment = "Rec".to_string();
        header.overwrite_comment("Recorded at 00:00:00 01/01/2024");
        assert_eq!(header.comment, "Recorded at 00:00:00 01/01/2024");
    }
}
