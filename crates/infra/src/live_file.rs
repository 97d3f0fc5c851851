//! Live data files: records written back to back, nothing else.
//!
//! ```text
//! [record][record][record] ...
//! ```
//!
//! Files are written without a header. A reader still accepts an optional
//! `INVD` magic plus version in front of the records.
//!
//! Older schemas appended a date to some records. After a record, the
//! reader looks ahead: when the next bytes fail to decode as a record but
//! do once an 8-byte date is skipped (or the date is the last thing in the
//! file), the date is consumed and dropped. Otherwise the first record that
//! cannot be decoded ends the load, and everything before it is kept.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::codec::{Reader, Writer};
use crate::error::StoreError;

/// Optional magic a reader accepts in front of the records.
pub const LIVE_MAGIC: u32 = 0x494E_5644;
pub const CURRENT_VERSION: u32 = 1;

/// Result of reading a live file.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Version from the header, or [`CURRENT_VERSION`] when there is none.
    pub version: u32,
    /// Set when a malformed record cut the read short.
    pub truncated: bool,
    /// Number of legacy trailing dates that were skipped.
    pub legacy_fields_skipped: usize,
}

impl<T> Loaded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            version: CURRENT_VERSION,
            truncated: false,
            legacy_fields_skipped: 0,
        }
    }
}

/// Read every decodable record from `path`. A missing file is an empty store.
pub fn read_records<T, F>(path: &Path, decode: F) -> Result<Loaded<T>, StoreError>
where
    F: Fn(&mut Reader<'_>) -> Result<T, StoreError>,
{
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet; starting empty");
            return Ok(Loaded::empty());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let loaded = decode_records(&bytes, decode)?;
    if loaded.truncated {
        warn!(
            path = %path.display(),
            kept = loaded.records.len(),
            "malformed record; load truncated"
        );
    }
    info!(
        path = %path.display(),
        records = loaded.records.len(),
        legacy_fields_skipped = loaded.legacy_fields_skipped,
        "data file loaded"
    );
    Ok(loaded)
}

/// Decode a whole live file image.
///
/// Only an unknown newer header version is an error; malformed records
/// truncate.
pub fn decode_records<T, F>(bytes: &[u8], decode: F) -> Result<Loaded<T>, StoreError>
where
    F: Fn(&mut Reader<'_>) -> Result<T, StoreError>,
{
    let mut reader = Reader::new(bytes);
    let mut version = CURRENT_VERSION;
    if reader.peek_u32() == Some(LIVE_MAGIC) {
        reader.get_u32("magic")?;
        version = reader.get_u32("version")?;
        if version > CURRENT_VERSION {
            return Err(StoreError::UnsupportedVersion(version));
        }
    }

    let mut loaded = Loaded {
        records: Vec::new(),
        version,
        truncated: false,
        legacy_fields_skipped: 0,
    };
    // A trailing date may only follow a record, and only once.
    let mut may_skip_date = false;
    while !reader.is_empty() {
        let offset = reader.position();
        let mut attempt = reader.clone();
        match decode(&mut attempt) {
            Ok(record) => {
                loaded.records.push(record);
                reader = attempt;
                may_skip_date = true;
            }
            Err(_) if may_skip_date && skip_legacy_date(&mut reader, &decode) => {
                debug!(offset, index = loaded.records.len(), "legacy trailing date skipped");
                loaded.legacy_fields_skipped += 1;
                may_skip_date = false;
            }
            Err(err) => {
                debug!(offset, index = loaded.records.len(), error = %err, "stopping at malformed record");
                loaded.truncated = true;
                break;
            }
        }
    }
    Ok(loaded)
}

/// Consume a date at the reader's position when it ends the file or is
/// followed by a decodable record. Leaves the reader untouched otherwise.
fn skip_legacy_date<T, F>(reader: &mut Reader<'_>, decode: &F) -> bool
where
    F: Fn(&mut Reader<'_>) -> Result<T, StoreError>,
{
    let mut after_date = reader.clone();
    if after_date.get_date("legacy date").is_err() {
        return false;
    }
    if !after_date.is_empty() && decode(&mut after_date.clone()).is_err() {
        return false;
    }
    *reader = after_date;
    true
}

/// Encode `records` back to back, as a live file image.
pub fn encode_records<'a, T, I, F>(records: I, encode: F) -> Result<Vec<u8>, StoreError>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T, &mut Writer) -> Result<(), StoreError>,
{
    let mut out = Writer::new();
    for record in records {
        encode(record, &mut out)?;
    }
    Ok(out.into_bytes())
}

/// Truncate `path` and write `records` to it.
pub fn write_records<'a, T, I, F>(path: &Path, records: I, encode: F) -> Result<usize, StoreError>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T, &mut Writer) -> Result<(), StoreError>,
{
    let mut count = 0usize;
    let bytes = encode_records(
        records.into_iter().inspect(|_| count += 1),
        encode,
    )?;
    std::fs::write(path, bytes).map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), records = count, "data file written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_pair(v: &(i32, String), w: &mut Writer) -> Result<(), StoreError> {
        w.put_i32(v.0);
        w.put_str(&v.1)
    }

    fn get_pair(r: &mut Reader<'_>) -> Result<(i32, String), StoreError> {
        let id = r.get_i32("id")?;
        if id <= 0 {
            return Err(StoreError::malformed(format!("id {id}")));
        }
        Ok((id, r.get_str("name")?))
    }

    fn pairs() -> Vec<(i32, String)> {
        vec![(1, "a".to_string()), (2, "bb".to_string()), (3, "ccc".to_string())]
    }

    const Y2K: i64 = 2_451_545;

    #[test]
    fn records_are_written_back_to_back() {
        let data = pairs();
        let bytes = encode_records(&data, put_pair).unwrap();
        assert_eq!(&bytes[..9], &[0, 0, 0, 1, 0, 0, 0, 1, b'a']);
        assert_eq!(bytes.len(), 3 * 8 + 6);

        let loaded = decode_records(&bytes, get_pair).unwrap();
        assert_eq!(loaded.records, data);
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert!(!loaded.truncated);
        assert_eq!(loaded.legacy_fields_skipped, 0);
    }

    #[test]
    fn optional_header_is_accepted() {
        let mut w = Writer::new();
        w.put_u32(LIVE_MAGIC);
        w.put_u32(CURRENT_VERSION);
        for pair in &pairs() {
            put_pair(pair, &mut w).unwrap();
        }
        let loaded = decode_records(w.as_bytes(), get_pair).unwrap();
        assert_eq!(loaded.records, pairs());
    }

    #[test]
    fn trailing_dates_are_consumed() {
        let data = pairs();
        let mut w = Writer::new();
        put_pair(&data[0], &mut w).unwrap();
        w.put_i64(Y2K);
        put_pair(&data[1], &mut w).unwrap();
        put_pair(&data[2], &mut w).unwrap();
        w.put_i64(Y2K);

        let loaded = decode_records(w.as_bytes(), get_pair).unwrap();
        assert_eq!(loaded.records, data);
        assert_eq!(loaded.legacy_fields_skipped, 2);
        assert!(!loaded.truncated);
    }

    #[test]
    fn garbage_after_a_record_truncates() {
        let mut bytes = encode_records(&pairs()[..1], put_pair).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 50, 1, 2, 3]);

        let loaded = decode_records(&bytes, get_pair).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.truncated);
    }

    #[test]
    fn date_not_followed_by_a_record_truncates() {
        let data = pairs();
        let mut w = Writer::new();
        put_pair(&data[0], &mut w).unwrap();
        w.put_i64(Y2K);
        w.put_u32(7);

        let loaded = decode_records(w.as_bytes(), get_pair).unwrap();
        assert_eq!(loaded.records, data[..1]);
        assert!(loaded.truncated);
        assert_eq!(loaded.legacy_fields_skipped, 0);
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut w = Writer::new();
        w.put_u32(LIVE_MAGIC);
        w.put_u32(CURRENT_VERSION + 1);
        let err = decode_records(w.as_bytes(), get_pair).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(2)));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = read_records(&dir.path().join("nope.dat"), get_pair).unwrap();
        assert!(loaded.records.is_empty());
    }
}
