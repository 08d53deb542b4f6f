//! Record stream parser
//!
//! A record stream is a sequence of
//! - time markers: `E0 C5 EA` followed by month, day, year, hour, minute
//! - measurements: voltage (u16, 1/10 V), current (u16, 1/1000 A),
//!   power factor (u8, 1/100)
//!
//! terminated by `FF FF FF`. Measurements after a marker are one sample
//! interval apart. Measurements before the first marker have no timestamp
//! until the header's logging start is known.

use super::{device_timestamp, ByteCursor};
use crate::dataset::Record;
use crate::types::{Result, Timestamp};
use chrono::TimeDelta;

/// Prefix of a time marker
pub const TIME_MARKER: [u8; 3] = [0xE0, 0xC5, 0xEA];

/// End of the record stream
pub const STREAM_END: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Parse a record stream into records in file order.
///
/// Bytes after the terminator are ignored.
pub fn parse(data: &[u8], interval: TimeDelta) -> Result<Vec<Record>> {
    let mut cursor = ByteCursor::new(data);
    let mut current: Option<Timestamp> = None;
    let mut records = Vec::new();

    loop {
        let chunk = cursor.read_array::<3>("record")?;
        if chunk == TIME_MARKER {
            let offset = cursor.offset();
            let raw = cursor.read_array::<5>("time marker")?;
            let [month, day, year, hour, minute] = raw;
            let timestamp =
                device_timestamp("time marker", offset, &raw, (year, month, day, hour, minute))?;
            log::trace!("Time marker at offset {}: {}", offset - TIME_MARKER.len(), timestamp);
            current = Some(timestamp);
        } else if chunk == STREAM_END {
            break;
        } else {
            let tail = cursor.read_array::<2>("record")?;
            let voltage_raw = u16::from_be_bytes([chunk[0], chunk[1]]);
            let current_raw = u16::from_be_bytes([chunk[2], tail[0]]);
            let power_factor_raw = tail[1];

            records.push(Record {
                timestamp: current,
                voltage: f64::from(voltage_raw) / 10.0,
                current: f64::from(current_raw) / 1000.0,
                power_factor: f64::from(power_factor_raw) / 100.0,
            });
            if let Some(timestamp) = current.as_mut() {
                *timestamp += interval;
            }
        }
    }

    if !cursor.is_empty() {
        log::debug!(
            "Ignoring {} byte(s) after the record stream terminator",
            cursor.remaining()
        );
    }

    Ok(records)
}
