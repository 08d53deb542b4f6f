//! Energy Logger Decoder Library
//!
//! A reusable library for decoding the binary data files written by
//! multi-sensor energy loggers and for working out what the measured
//! consumption cost under time-of-day tariffs.
//!
//! # Architecture
//!
//! This library is intentionally free of I/O:
//! - [`Decoder`] turns the bytes of one file into updates of a per-sensor
//!   [`SensorDataset`] (header summary plus a sorted time series)
//! - [`tariff::merge`] reconciles tariff 1 and tariff 2 start times into
//!   daily tariff 1 windows
//! - [`cost::cost_series`] combines both into a per-record cost
//!
//! File discovery, argument parsing and rendering live in the application
//! layer (energy-logger-cli).
//!
//! # Example Usage
//!
//! ```
//! use energy_logger_decoder::{tariff, Decoder, SensorDataset};
//!
//! let decoder = Decoder::new();
//! let mut dataset = SensorDataset::new();
//!
//! // Time marker for 2024-05-01 08:00, one measurement, terminator
//! let stream = [
//!     0xE0, 0xC5, 0xEA, 5, 1, 24, 8, 0,
//!     0x08, 0xFC, 0x01, 0xF4, 0x5F,
//!     0xFF, 0xFF, 0xFF,
//! ];
//! decoder.accumulate(&mut dataset, &stream).unwrap();
//!
//! let record = &dataset.records()[0];
//! assert_eq!(record.voltage, 230.0);
//!
//! let day = tariff::parse_time_of_day("07:00").unwrap();
//! let night = tariff::parse_time_of_day("23:00").unwrap();
//! let schedule = tariff::merge(&[night], &[day]);
//! assert!(!schedule.is_tariff1(record.timestamp.unwrap().time()));
//! ```

// Public modules
pub mod config;
pub mod cost;
pub mod dataset;
pub mod decoder;
pub mod formats;
pub mod tariff;
pub mod types;

// Re-export main types for convenience
pub use config::{DecoderConfig, EARLIEST_TIMESTAMP, SAMPLE_INTERVAL_SECS};
pub use cost::CostPoint;
pub use dataset::{DailyTotal, Record, SensorDataset, SensorHeader};
pub use decoder::Decoder;
pub use formats::BlockKind;
pub use tariff::{ConflictWarning, TariffSchedule, TariffWindow, TimeOfDay};
pub use types::{DecoderError, ErrorKind, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh dataset is empty
        let dataset = SensorDataset::new();
        assert!(!dataset.has_header());
        assert!(dataset.records().is_empty());
        assert_eq!(Decoder::new().config(), &DecoderConfig::default());
    }
}
