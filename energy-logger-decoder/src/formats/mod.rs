//! Energy logger file block parsers
//!
//! A log file holds exactly one block. The first five bytes decide which:
//! the literal `INFO:` introduces a header block, anything else is a record
//! stream.

use crate::types::{DecoderError, Result, Timestamp};
use chrono::NaiveDate;

pub mod cursor;
pub mod header;
pub mod records;

pub use cursor::ByteCursor;

/// Magic prefix of a header block
pub const HEADER_MAGIC: &[u8; 5] = b"INFO:";

/// Block type of a file, decided from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Records,
}

impl BlockKind {
    /// Inspect the fixed prefix of `data`
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(HEADER_MAGIC) {
            BlockKind::Header
        } else {
            BlockKind::Records
        }
    }
}

/// Build a device timestamp; the device stores the year as an offset from 2000.
pub(crate) fn device_timestamp(
    field: &'static str,
    offset: usize,
    bytes: &[u8],
    (year, month, day, hour, minute): (u8, u8, u8, u8, u8),
) -> Result<Timestamp> {
    NaiveDate::from_ymd_opt(2000 + i32::from(year), u32::from(month), u32::from(day))
        .and_then(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), 0))
        .ok_or_else(|| DecoderError::InvalidTimestamp {
            field,
            offset,
            bytes: bytes.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_block_kind() {
        assert_eq!(BlockKind::detect(b"INFO:\x00\x01"), BlockKind::Header);
        assert_eq!(BlockKind::detect(b"INFO"), BlockKind::Records);
        assert_eq!(BlockKind::detect(&[0xE0, 0xC5, 0xEA]), BlockKind::Records);
        assert_eq!(BlockKind::detect(&[]), BlockKind::Records);
    }

    #[test]
    fn test_device_timestamp() {
        let ts = device_timestamp("since", 0, &[], (24, 2, 29, 23, 59)).unwrap();
        assert_eq!(ts.to_string(), "2024-02-29 23:59:00");

        let err = device_timestamp("since", 7, &[1, 2], (23, 2, 29, 0, 0)).unwrap_err();
        assert_eq!(
            err,
            DecoderError::InvalidTimestamp {
                field: "since",
                offset: 7,
                bytes: vec![1, 2],
            }
        );
    }
}
