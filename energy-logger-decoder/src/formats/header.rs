//! Header block parser
//!
//! Layout after the `INFO:` magic (big-endian throughout):
//!
//! | bytes  | field                                   |
//! |--------|-----------------------------------------|
//! | 3      | total energy, Wh                        |
//! | 3      | recorded time, 1/100 h                  |
//! | 3      | on time, 1/100 h                        |
//! | 10 × 3 | daily energy, Wh                        |
//! | 10 × 2 | daily recorded time, raw packed         |
//! | 10 × 2 | daily on time, raw packed               |
//! | 1      | sensor id                               |
//! | 4      | tariff 1 rate, byte-coded decimal, 1e-3 |
//! | 4      | tariff 2 rate, byte-coded decimal, 1e-3 |
//! | 5      | logging start: hour, minute, month, day, year |
//! | 4      | trailer `FF FF FF FF`                   |

use super::{device_timestamp, ByteCursor, HEADER_MAGIC};
use crate::dataset::{DailyTotal, SensorHeader, DAILY_TOTAL_COUNT};
use crate::types::{DecoderError, Result};

/// Bytes that must close a header block
pub const HEADER_TRAILER: [u8; 4] = [0xFF; 4];

/// Highest sensor id a logger can report
pub const MAX_SENSOR_ID: u8 = 9;

/// Parse a complete header block, magic included.
pub fn parse(data: &[u8]) -> Result<SensorHeader> {
    let mut cursor = ByteCursor::new(data);
    cursor.take(HEADER_MAGIC.len(), "header magic")?;

    let total_energy_kwh = f64::from(cursor.read_u24("total energy")?) / 1000.0;
    let recorded_hours = f64::from(cursor.read_u24("recorded time")?) / 100.0;
    let on_hours = f64::from(cursor.read_u24("on time")?) / 100.0;

    let mut daily_totals = [DailyTotal::default(); DAILY_TOTAL_COUNT];
    for day in daily_totals.iter_mut() {
        day.energy_kwh = f64::from(cursor.read_u24("daily energy")?) / 1000.0;
    }
    for day in daily_totals.iter_mut() {
        day.recorded_minutes = cursor.read_u16("daily recorded time")?;
    }
    for day in daily_totals.iter_mut() {
        day.on_minutes = cursor.read_u16("daily on time")?;
    }

    let sensor_offset = cursor.offset();
    let sensor_id = cursor.read_u8("sensor id")?;
    if sensor_id > MAX_SENSOR_ID {
        return Err(DecoderError::SensorIdOutOfRange {
            offset: sensor_offset,
            value: sensor_id,
        });
    }

    let tariff1_rate = cursor.read_bcd(4, "tariff 1 rate")? as f64 / 1000.0;
    let tariff2_rate = cursor.read_bcd(4, "tariff 2 rate")? as f64 / 1000.0;

    let since_offset = cursor.offset();
    let raw = cursor.read_array::<5>("logging start")?;
    let [hour, minute, month, day, year] = raw;
    let since = device_timestamp(
        "logging start",
        since_offset,
        &raw,
        (year, month, day, hour, minute),
    )?;

    let trailer_offset = cursor.offset();
    let trailer = cursor.rest();
    if trailer != HEADER_TRAILER {
        return Err(DecoderError::BadTrailer {
            offset: trailer_offset,
            expected: HEADER_TRAILER.to_vec(),
            actual: trailer.to_vec(),
        });
    }

    Ok(SensorHeader {
        total_energy_kwh,
        recorded_hours,
        on_hours,
        daily_totals,
        sensor_id,
        tariff1_rate,
        tariff2_rate,
        since,
    })
}
