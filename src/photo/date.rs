use std::fs;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag, Value};
use tracing::debug;

use crate::error::MetadataError;
use crate::photo::Photo;

/// A single orderable point in time attached to one photo
///
/// Derived per run, never stored. EXIF carries no timezone, so wall-clock
/// values are interpreted as UTC; only relative order matters here.
pub type CaptureTimestamp = DateTime<Utc>;

/// EXIF stores DateTimeOriginal as e.g. "2024:01:02 13:37:00".
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Derive the capture timestamp for a photo
///
/// Reads EXIF `DateTimeOriginal` when present and parseable, otherwise
/// falls back to the file's modification time. Total: a batch with no
/// metadata at all still sorts deterministically, and a corrupt metadata
/// block is treated the same as an absent one.
pub fn extract(photo: &Photo) -> CaptureTimestamp {
    match exif_capture_time(&photo.path) {
        Ok(timestamp) => timestamp,
        Err(err) => {
            debug!(photo = %photo.name, %err, "falling back to modification time");
            modified_time(&photo.path)
        }
    }
}

fn exif_capture_time(path: &Path) -> Result<CaptureTimestamp, MetadataError> {
    let unavailable = |reason: String| MetadataError::CaptureTimeUnavailable { reason };

    let file = fs::File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| unavailable(e.to_string()))?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or_else(|| unavailable("DateTimeOriginal not present".to_string()))?;

    let raw = match field.value {
        Value::Ascii(ref lines) if !lines.is_empty() => {
            String::from_utf8_lossy(&lines[0]).into_owned()
        }
        _ => return Err(unavailable("DateTimeOriginal is not an ASCII field".to_string())),
    };

    parse_exif_datetime(raw.trim())
}

fn parse_exif_datetime(raw: &str) -> Result<CaptureTimestamp, MetadataError> {
    NaiveDateTime::parse_from_str(raw, EXIF_DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| MetadataError::CaptureTimeUnavailable {
            reason: format!("{:?}: {}", raw, e),
        })
}

/// Storage-level fallback. A file that cannot be stat'd at all (already
/// deleted, permission change mid-run) keys at the epoch rather than
/// aborting the batch.
fn modified_time(path: &Path) -> CaptureTimestamp {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_exif_datetime() {
        let parsed = parse_exif_datetime("2024:01:02 03:04:05").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        assert!(parse_exif_datetime("2024-01-02 03:04:05").is_err());
        assert!(parse_exif_datetime("not a date").is_err());
        assert!(parse_exif_datetime("").is_err());
    }

    #[test]
    fn test_extract_falls_back_to_modification_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_metadata.jpg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not a real jpeg").unwrap();
        drop(file);

        let expected: CaptureTimestamp =
            std::fs::metadata(&path).unwrap().modified().unwrap().into();

        let photo = Photo::new(&path);
        assert_eq!(extract(&photo), expected);
    }

    #[test]
    fn test_extract_is_total_for_missing_files() {
        let photo = Photo::new("/definitely/not/here.jpg");
        assert_eq!(extract(&photo), DateTime::UNIX_EPOCH);
    }
}
