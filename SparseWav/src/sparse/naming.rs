//! File naming conventions
//!
//! Compressed recordings carry a `T` before the extension (`REC001T.WAV`).
//! Restored files drop it; expanded files are named after their UTC start
//! time as `YYYYMMDD_HHMMSS.WAV`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Compressed-name markers and what they become once restored
const COMPRESSED_MARKERS: [(&str, &str); 2] = [("T.WAV", ".WAV"), ("T.wav", ".wav")];

/// Plain WAV extensions, in the case they are written
const WAV_EXTENSIONS: [&str; 2] = [".WAV", ".wav"];

const EXPANDED_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Locate the last compressed marker in a file name.
fn find_marker(name: &str) -> Option<(usize, &'static str, &'static str)> {
    COMPRESSED_MARKERS
        .iter()
        .filter_map(|&(marker, replacement)| {
            name.rfind(marker).map(|index| (index, marker, replacement))
        })
        .max_by_key(|&(index, _, _)| index)
}

/// Whether the file name carries the compressed marker.
pub fn is_compressed_name(path: &Path) -> bool {
    file_name(path).and_then(find_marker).is_some()
}

/// Output path for decompressing `input`: `REC001T.WAV` becomes `REC001.WAV`.
///
/// The restored file lands beside the input unless `output_dir` is given.
///
/// # Errors
///
/// Returns [`Error::InvalidFileName`] if the name carries no compressed marker.
///
/// [`Error::InvalidFileName`]: crate::Error::InvalidFileName
pub fn decompressed_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let invalid = || Error::InvalidFileName {
        path: input.to_path_buf(),
    };

    let name = file_name(input).ok_or_else(invalid)?;
    let (index, marker, replacement) = find_marker(name).ok_or_else(invalid)?;

    let restored = format!(
        "{}{replacement}{}",
        &name[..index],
        &name[index + marker.len()..]
    );

    Ok(output_directory(input, output_dir).join(restored))
}

/// Output path for compressing `input`: `REC001.WAV` becomes `REC001T.WAV`.
///
/// # Errors
///
/// Returns [`Error::NotCompressible`] if the name does not end in `.WAV` or
/// `.wav`, or already carries the compressed marker.
///
/// [`Error::NotCompressible`]: crate::Error::NotCompressible
pub fn compressed_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let invalid = || Error::NotCompressible {
        path: input.to_path_buf(),
    };

    let name = file_name(input).ok_or_else(invalid)?;
    if find_marker(name).is_some() {
        return Err(invalid());
    }

    let extension = WAV_EXTENSIONS
        .iter()
        .find(|ext| name.ends_with(*ext))
        .ok_or_else(invalid)?;

    let stem = &name[..name.len() - extension.len()];
    Ok(output_directory(input, output_dir).join(format!("{stem}T{extension}")))
}

/// File name for an expanded file starting at `timestamp`.
///
/// An empty prefix is treated as no prefix.
pub fn expanded_file_name(prefix: Option<&str>, timestamp: &DateTime<Utc>) -> String {
    let stamp = timestamp.format(EXPANDED_NAME_FORMAT);

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}_{stamp}.WAV"),
        _ => format!("{stamp}.WAV"),
    }
}

/// Directory that outputs for `input` are written to.
pub(crate) fn output_directory(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decompressed_path_upper_and_lower() {
        assert_eq!(
            decompressed_path(Path::new("/data/REC001T.WAV"), None).unwrap(),
            PathBuf::from("/data/REC001.WAV")
        );
        assert_eq!(
            decompressed_path(Path::new("/data/rec001T.wav"), None).unwrap(),
            PathBuf::from("/data/rec001.wav")
        );
    }

    #[test]
    fn test_decompressed_path_uses_last_marker() {
        assert_eq!(
            decompressed_path(Path::new("AT.WAVE_BT.WAV"), None).unwrap(),
            PathBuf::from("AT.WAVE_B.WAV")
        );
    }

    #[test]
    fn test_decompressed_path_output_dir() {
        assert_eq!(
            decompressed_path(Path::new("/in/20230201_123456T.WAV"), Some(Path::new("/out")))
                .unwrap(),
            PathBuf::from("/out/20230201_123456.WAV")
        );
    }

    #[test]
    fn test_decompressed_path_rejects_plain_names() {
        for name in ["REC001.WAV", "REC001t.wav", "REC001T.Wav", "T.WAV/REC001.WAV"] {
            assert!(
                matches!(
                    decompressed_path(Path::new(name), None),
                    Err(Error::InvalidFileName { .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn test_is_compressed_name() {
        assert!(is_compressed_name(Path::new("dir/20230201_123456T.WAV")));
        assert!(!is_compressed_name(Path::new("dir/20230201_123456.WAV")));
    }

    #[test]
    fn test_compressed_path() {
        assert_eq!(
            compressed_path(Path::new("/data/REC001.WAV"), None).unwrap(),
            PathBuf::from("/data/REC001T.WAV")
        );
        assert!(compressed_path(Path::new("/data/REC001T.WAV"), None).is_err());
        assert!(compressed_path(Path::new("/data/REC001.flac"), None).is_err());
    }

    #[test]
    fn test_expanded_file_name() {
        let time = Utc.with_ymd_and_hms(2023, 2, 1, 12, 34, 56).unwrap();
        assert_eq!(expanded_file_name(None, &time), "20230201_123456.WAV");
        assert_eq!(expanded_file_name(Some(""), &time), "20230201_123456.WAV");
        assert_eq!(expanded_file_name(Some("SITE01"), &time), "SITE01_20230201_123456.WAV");
    }
}
