//! Per-sensor accumulated data
//!
//! A [`SensorDataset`] collects everything decoded for one sensor across all
//! of its files: at most one header block and any number of record streams.
//! The two `merge_*` methods are the only mutators and both leave the record
//! series sorted and backfilled before returning.

use crate::config::EARLIEST_TIMESTAMP;
use crate::types::{DecoderError, Result, Timestamp};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Number of per-day totals stored in a header block
pub const DAILY_TOTAL_COUNT: usize = 10;

/// One day of the header's daily breakdown (index = day offset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub energy_kwh: f64,
    /// Raw packed value as stored by the device.
    ///
    /// Looks like `hour * 100 + minute` but does not decode to a real duration
    /// on the hardware seen so far, so it is kept verbatim.
    pub recorded_minutes: u16,
    /// Raw packed value, same encoding as `recorded_minutes`
    pub on_minutes: u16,
}

/// Summary fields carried by a header block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorHeader {
    pub total_energy_kwh: f64,
    pub recorded_hours: f64,
    pub on_hours: f64,
    pub daily_totals: [DailyTotal; DAILY_TOTAL_COUNT],
    /// 0..=9
    pub sensor_id: u8,
    /// Currency per kWh
    pub tariff1_rate: f64,
    /// Currency per kWh
    pub tariff2_rate: f64,
    /// Start of logging
    pub since: Timestamp,
}

/// A single one-minute measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// `None` until a time marker or the header's `since` anchors it
    pub timestamp: Option<Timestamp>,
    /// Volts
    pub voltage: f64,
    /// Amperes
    pub current: f64,
    /// cos φ
    pub power_factor: f64,
}

impl Record {
    /// Active power in watts
    pub fn active_power_w(&self) -> f64 {
        self.apparent_power_va() * self.power_factor
    }

    /// Apparent power in volt-amperes
    pub fn apparent_power_va(&self) -> f64 {
        self.voltage * self.current
    }

    fn sort_key(&self) -> Timestamp {
        self.timestamp.unwrap_or(EARLIEST_TIMESTAMP)
    }
}

/// Everything decoded so far for one sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorDataset {
    header: Option<SensorHeader>,
    records: Vec<Record>,
}

impl SensorDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded header block.
    ///
    /// Fails without modifying the dataset if a header is already present.
    pub fn merge_header(&mut self, header: SensorHeader, interval: TimeDelta) -> Result<()> {
        if let Some(existing) = &self.header {
            return Err(DecoderError::DuplicateHeader {
                sensor_id: existing.sensor_id,
            });
        }
        log::debug!(
            "Sensor {}: header logging since {}",
            header.sensor_id,
            header.since
        );
        self.header = Some(header);
        self.settle(interval);
        Ok(())
    }

    /// Append decoded records and restore ordering.
    pub fn merge_records(&mut self, records: Vec<Record>, interval: TimeDelta) {
        self.records.extend(records);
        self.settle(interval);
    }

    /// Re-establish the series invariants: stable sort, then backfill.
    fn settle(&mut self, interval: TimeDelta) {
        sort_records(&mut self.records);
        if let Some(since) = self.since() {
            backfill_leading(&mut self.records, since, interval);
        }
    }

    pub fn header(&self) -> Option<&SensorHeader> {
        self.header.as_ref()
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn total_energy_kwh(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.total_energy_kwh)
    }

    pub fn recorded_hours(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.recorded_hours)
    }

    pub fn on_hours(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.on_hours)
    }

    pub fn sensor_id(&self) -> Option<u8> {
        self.header.as_ref().map(|h| h.sensor_id)
    }

    pub fn tariff1_rate(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.tariff1_rate)
    }

    pub fn tariff2_rate(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.tariff2_rate)
    }

    pub fn since(&self) -> Option<Timestamp> {
        self.header.as_ref().map(|h| h.since)
    }

    /// Per-day totals; empty until a header has been merged
    pub fn daily_totals(&self) -> &[DailyTotal] {
        match &self.header {
            Some(header) => &header.daily_totals,
            None => &[],
        }
    }
}

/// Stable sort by timestamp, unresolved entries first in insertion order
pub fn sort_records(records: &mut [Record]) {
    records.sort_by_key(Record::sort_key);
}

/// Assign `since`, `since + interval`, ... to the leading run of records that
/// have no timestamp. Stops at the first resolved record.
pub fn backfill_leading(records: &mut [Record], since: Timestamp, interval: TimeDelta) {
    let mut next = since;
    for record in records.iter_mut() {
        if record.timestamp.is_some() {
            break;
        }
        record.timestamp = Some(next);
        next += interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32, minute: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(timestamp: Option<Timestamp>, voltage: f64) -> Record {
        Record {
            timestamp,
            voltage,
            current: 1.0,
            power_factor: 1.0,
        }
    }

    fn header(sensor_id: u8, since: Timestamp) -> SensorHeader {
        SensorHeader {
            total_energy_kwh: 1.5,
            recorded_hours: 10.0,
            on_hours: 5.0,
            daily_totals: [DailyTotal::default(); DAILY_TOTAL_COUNT],
            sensor_id,
            tariff1_rate: 0.1,
            tariff2_rate: 0.2,
            since,
        }
    }

    #[test]
    fn test_sort_is_stable_with_unresolved_first() {
        let mut records = vec![
            record(Some(ts(10, 0)), 1.0),
            record(None, 2.0),
            record(Some(ts(9, 0)), 3.0),
            record(None, 4.0),
            record(Some(ts(9, 0)), 5.0),
        ];
        sort_records(&mut records);
        let voltages: Vec<f64> = records.iter().map(|r| r.voltage).collect();
        assert_eq!(voltages, vec![2.0, 4.0, 3.0, 5.0, 1.0]);
    }

    #[test]
    fn test_backfill_stops_at_first_resolved() {
        let mut records = vec![
            record(None, 1.0),
            record(None, 2.0),
            record(Some(ts(12, 0)), 3.0),
            record(None, 4.0),
        ];
        backfill_leading(&mut records, ts(8, 0), TimeDelta::seconds(60));

        assert_eq!(records[0].timestamp, Some(ts(8, 0)));
        assert_eq!(records[1].timestamp, Some(ts(8, 1)));
        assert_eq!(records[2].timestamp, Some(ts(12, 0)));
        assert_eq!(records[3].timestamp, None);
    }

    #[test]
    fn test_duplicate_header_is_rejected_without_change() {
        let mut dataset = SensorDataset::new();
        dataset
            .merge_header(header(3, ts(8, 0)), TimeDelta::seconds(60))
            .unwrap();

        let err = dataset
            .merge_header(header(4, ts(9, 0)), TimeDelta::seconds(60))
            .unwrap_err();
        assert_eq!(err, DecoderError::DuplicateHeader { sensor_id: 3 });
        assert_eq!(dataset.sensor_id(), Some(3));
        assert_eq!(dataset.since(), Some(ts(8, 0)));
    }

    #[test]
    fn test_header_after_records_backfills() {
        let mut dataset = SensorDataset::new();
        dataset.merge_records(
            vec![record(None, 1.0), record(None, 2.0)],
            TimeDelta::seconds(60),
        );
        assert!(dataset.records().iter().all(|r| r.timestamp.is_none()));
        assert!(dataset.daily_totals().is_empty());

        dataset
            .merge_header(header(0, ts(7, 30)), TimeDelta::seconds(60))
            .unwrap();
        let stamps: Vec<_> = dataset.records().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![Some(ts(7, 30)), Some(ts(7, 31))]);
        assert_eq!(dataset.daily_totals().len(), DAILY_TOTAL_COUNT);
    }

    #[test]
    fn test_power_helpers() {
        let r = Record {
            timestamp: None,
            voltage: 230.0,
            current: 2.0,
            power_factor: 0.5,
        };
        assert_eq!(r.apparent_power_va(), 460.0);
        assert_eq!(r.active_power_w(), 230.0);
    }
}
