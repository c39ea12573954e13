//! Shared streaming plumbing: input validation, block reads, zero fill and
//! progress accounting

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::formats::wav::{HEADER_LENGTH, WavHeader, check_header, read_header};

/// Progress callback, called with a percentage in `0..=100`
pub type ProgressCallback<'a> = &'a dyn Fn(u8);

/// Offset of the RIFF chunk size
const RIFF_SIZE_OFFSET: u64 = 4;

/// Offset of the data chunk size, the last field of the header
const DATA_SIZE_OFFSET: u64 = HEADER_LENGTH as u64 - 4;

/// Percentage between progress reports
const PROGRESS_STEP: u8 = 10;

/// Size of the shared zero buffer used for silence
const ZERO_CHUNK: usize = 8192;

static ZEROS: [u8; ZERO_CHUNK] = [0; ZERO_CHUNK];

/// Map IO failures inside the streaming loop to [`Error::Processing`]
pub(crate) trait ProcessingContext<T> {
    fn processing(self) -> Result<T>;
}

impl<T> ProcessingContext<T> for io::Result<T> {
    fn processing(self) -> Result<T> {
        self.map_err(Error::Processing)
    }
}

/// A recorder file that has passed header validation
pub(crate) struct ValidatedInput {
    pub reader: BufReader<File>,
    pub size: u64,
    pub header: WavHeader,
    /// The first block of the file: the header plus the alignment bytes
    /// that bring the next read onto a block boundary
    pub first_block: Vec<u8>,
}

/// Open `path`, read its first block and validate the header.
///
/// Each failure maps to its own error so the caller can tell where it
/// stopped. Nothing is written anywhere.
pub(crate) fn open_input(path: &Path, block_size: usize) -> Result<ValidatedInput> {
    let file = File::open(path).map_err(|source| Error::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let size = file
        .metadata()
        .map_err(|source| Error::InputStat {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if size == 0 {
        return Err(Error::EmptyInput);
    }

    if size < HEADER_LENGTH as u64 {
        return Err(Error::InputTooSmall);
    }

    let mut reader = BufReader::new(file);

    let first_len = size.min(block_size as u64) as usize;
    let mut first_block = vec![0u8; first_len];
    reader.read_exact(&mut first_block).map_err(Error::HeaderRead)?;

    let header = read_header(&first_block)?;
    check_header(&header, size)?;

    Ok(ValidatedInput {
        reader,
        size,
        header,
        first_block,
    })
}

/// Create an output file, mapping failure to [`Error::OutputCreate`].
pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::OutputCreate {
            path: path.to_path_buf(),
            source,
        })
}

/// Flush `writer` and overwrite the start of its file with `header`.
pub(crate) fn rewrite_header(writer: BufWriter<File>, header: &WavHeader) -> Result<()> {
    let bytes = header.to_bytes()?;

    let mut file = writer
        .into_inner()
        .map_err(|err| Error::Processing(err.into_error()))?;

    file.seek(SeekFrom::Start(0)).processing()?;
    file.write_all(&bytes).processing()?;
    file.flush().processing()
}

/// Flush `writer` and patch only the RIFF and data sizes of the header it
/// starts with. Every other header byte stays as it was copied.
pub(crate) fn patch_sizes(writer: BufWriter<File>, data_size: u32) -> Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(|err| Error::Processing(err.into_error()))?;

    let riff_size = data_size.saturating_add(HEADER_LENGTH as u32 - 8);

    file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET)).processing()?;
    file.write_u32::<LittleEndian>(riff_size).processing()?;
    file.seek(SeekFrom::Start(DATA_SIZE_OFFSET)).processing()?;
    file.write_u32::<LittleEndian>(data_size).processing()?;
    file.flush().processing()
}

/// Fill `buf` from `reader`, stopping early only at end of input.
///
/// Returns the number of bytes read; anything less than `buf.len()` means
/// the input is exhausted.
pub(crate) fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

/// Write `count` zero bytes.
pub(crate) fn write_zeros<W: Write>(writer: &mut W, mut count: u64) -> io::Result<()> {
    while count > 0 {
        let len = count.min(ZERO_CHUNK as u64) as usize;
        writer.write_all(&ZEROS[..len])?;
        count -= len as u64;
    }

    Ok(())
}

/// Reports progress through the input at each 10% step
pub(crate) struct ProgressTracker<'a> {
    callback: ProgressCallback<'a>,
    total: u64,
    consumed: u64,
    next_step: u8,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(callback: ProgressCallback<'a>, total: u64) -> Self {
        Self {
            callback,
            total,
            consumed: 0,
            next_step: PROGRESS_STEP,
        }
    }

    /// Record `bytes` more input consumed, reporting any steps crossed.
    pub fn advance(&mut self, bytes: u64) {
        self.consumed += bytes;

        while self.next_step < 100
            && self.consumed * 100 >= u64::from(self.next_step) * self.total
        {
            (self.callback)(self.next_step);
            self.next_step += PROGRESS_STEP;
        }
    }

    /// Report completion.
    pub fn finish(&mut self) {
        (self.callback)(100);
    }
}
