//! Big-endian primitive codec shared by the live files and the snapshot
//! format.
//!
//! - integers and floats are big-endian, fixed width
//! - strings are a `u32` byte length followed by UTF-8; `0xFFFF_FFFF` is a
//!   null string and reads back as empty
//! - dates are an `i64` Julian Day Number, `0` meaning "no date"

use chrono::{Datelike, NaiveDate};

use crate::error::StoreError;

const NULL_STRING: u32 = u32::MAX;
/// Julian Day Number of 0001-01-01 minus chrono's day number for that date.
const JDN_CE_OFFSET: i64 = 1_721_425;

#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_str(&mut self, s: &str) -> Result<(), StoreError> {
        let len = u32::try_from(s.len())
            .ok()
            .filter(|len| *len != NULL_STRING)
            .ok_or_else(|| StoreError::malformed("string too long to encode"))?;
        self.put_u32(len);
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    pub fn put_date(&mut self, date: Option<NaiveDate>) {
        self.put_i64(date.map_or(0, julian_day));
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], StoreError> {
        if self.remaining() < n {
            return Err(StoreError::malformed(format!(
                "{what}: need {n} bytes at offset {}, {} left",
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], StoreError> {
        let bytes = self.take(N, what)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Look at the next `u32` without consuming it.
    pub fn peek_u32(&self) -> Option<u32> {
        self.clone().get_u32("peek").ok()
    }

    pub fn get_u32(&mut self, what: &str) -> Result<u32, StoreError> {
        Ok(u32::from_be_bytes(self.take_array(what)?))
    }

    pub fn get_i32(&mut self, what: &str) -> Result<i32, StoreError> {
        Ok(i32::from_be_bytes(self.take_array(what)?))
    }

    pub fn get_i64(&mut self, what: &str) -> Result<i64, StoreError> {
        Ok(i64::from_be_bytes(self.take_array(what)?))
    }

    pub fn get_f64(&mut self, what: &str) -> Result<f64, StoreError> {
        Ok(f64::from_be_bytes(self.take_array(what)?))
    }

    pub fn get_str(&mut self, what: &str) -> Result<String, StoreError> {
        let len = self.get_u32(what)?;
        if len == NULL_STRING {
            return Ok(String::new());
        }
        let len = usize::try_from(len).map_err(|_| StoreError::malformed(what.to_string()))?;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::malformed(format!("{what}: invalid utf-8: {e}")))
    }

    pub fn get_date(&mut self, what: &str) -> Result<Option<NaiveDate>, StoreError> {
        let jdn = self.get_i64(what)?;
        if jdn == 0 {
            return Ok(None);
        }
        from_julian_day(jdn)
            .map(Some)
            .ok_or_else(|| StoreError::malformed(format!("{what}: julian day {jdn} out of range")))
    }
}

pub fn julian_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET
}

pub fn from_julian_day(jdn: i64) -> Option<NaiveDate> {
    let days = i32::try_from(jdn - JDN_CE_OFFSET).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut w = Writer::new();
        w.put_i32(1);
        w.put_u32(0x0A0B_0C0D);
        assert_eq!(w.as_bytes(), &[0, 0, 0, 1, 0x0A, 0x0B, 0x0C, 0x0D]);
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut w = Writer::new();
        w.put_str("hé").unwrap();
        assert_eq!(w.as_bytes(), &[0, 0, 0, 3, b'h', 0xC3, 0xA9]);

        let mut r = Reader::new(w.as_bytes());
        assert_eq!(r.get_str("s").unwrap(), "hé");
        assert!(r.is_empty());
    }

    #[test]
    fn null_string_reads_as_empty() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(Reader::new(&bytes).get_str("s").unwrap(), "");
    }

    #[test]
    fn short_input_is_malformed() {
        let bytes = [0, 0, 0, 9, b'a'];
        let err = Reader::new(&bytes).get_str("name").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(m) if m.starts_with("name")));
    }

    #[test]
    fn julian_day_matches_known_dates() {
        let unix_epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(julian_day(unix_epoch), 2_440_588);
        let y2k = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(julian_day(y2k), 2_451_545);
        assert_eq!(from_julian_day(2_451_545), Some(y2k));
    }
}
