//! Decoder configuration types
//!
//! The logger writes one measurement per minute. Records that are not preceded
//! by a time marker get their timestamps derived from that cadence, so the
//! interval is carried explicitly through every sort/backfill step.

use crate::types::{DecoderError, Result, Timestamp};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Cadence of implicit records, in seconds
pub const SAMPLE_INTERVAL_SECS: i64 = 60;

/// Longest accepted cadence: one sample per day
pub const MAX_SAMPLE_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Sort key substituted for records whose timestamp is still unknown.
///
/// Every resolved timestamp compares greater than or equal to it, so unresolved
/// records stay in front of the series in insertion order.
pub const EARLIEST_TIMESTAMP: Timestamp = NaiveDateTime::MIN;

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Spacing between consecutive implicit records
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: i64,
}

fn default_sample_interval() -> i64 {
    SAMPLE_INTERVAL_SECS
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: SAMPLE_INTERVAL_SECS,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the implicit record cadence
    pub fn with_sample_interval_secs(mut self, secs: i64) -> Self {
        self.sample_interval_secs = secs;
        self
    }

    /// The implicit record cadence as a duration.
    ///
    /// Fails unless the interval is positive and at most one day, so implicit
    /// timestamps always move forward.
    pub fn sample_interval(&self) -> Result<TimeDelta> {
        let secs = self.sample_interval_secs;
        if !(1..=MAX_SAMPLE_INTERVAL_SECS).contains(&secs) {
            return Err(DecoderError::SampleIntervalOutOfRange {
                secs,
                max: MAX_SAMPLE_INTERVAL_SECS,
            });
        }
        Ok(TimeDelta::seconds(secs))
    }
}
