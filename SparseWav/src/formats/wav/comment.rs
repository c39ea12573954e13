//! Recording timestamp carried at the start of the `ICMT` comment
//!
//! Recorder comments begin with `Recorded at HH:MM:SS DD/MM/YYYY` in UTC and
//! may carry further text after it (timezone, device id, battery state).

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Fixed text that opens every recorder comment
pub const COMMENT_PREFIX: &str = "Recorded at ";

/// Shape of the timestamp after the prefix; `9` stands for any ASCII digit
const TIMESTAMP_SHAPE: &[u8] = b"99:99:99 99/99/9999";

const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// Parse the recording start time from the beginning of a comment.
///
/// # Errors
///
/// Returns [`Error::CommentFormat`] if the comment does not open with the
/// timestamp phrase or the fields do not form a real date and time.
///
/// [`Error::CommentFormat`]: crate::Error::CommentFormat
pub fn parse_recording_time(comment: &str) -> Result<DateTime<Utc>> {
    let stamp = comment
        .strip_prefix(COMMENT_PREFIX)
        .and_then(|rest| rest.get(..TIMESTAMP_SHAPE.len()))
        .ok_or(Error::CommentFormat)?;

    let shape_matches = stamp
        .bytes()
        .zip(TIMESTAMP_SHAPE)
        .all(|(actual, &expected)| match expected {
            b'9' => actual.is_ascii_digit(),
            _ => actual == expected,
        });

    if !shape_matches {
        return Err(Error::CommentFormat);
    }

    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::CommentFormat)
}

/// Format the comment phrase for a recording that started at `timestamp`.
pub fn format_recording_comment(timestamp: &DateTime<Utc>) -> String {
    format!("{COMMENT_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT))
}
