//! Tariff window merging
//!
//! Users give two independent lists of daily clock times: the moments tariff 1
//! starts applying and the moments tariff 2 (the background rate) resumes.
//! [`merge`] reconciles them into ordered, non-overlapping windows during which
//! tariff 1 applies.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily clock time
pub type TimeOfDay = NaiveTime;

/// Error returned by [`parse_time_of_day`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time of day {input:?}: expected hh[:mm[:ss]]")]
pub struct TimeParseError {
    pub input: String,
}

/// Parse `hh`, `hh:mm` or `hh:mm:ss`
pub fn parse_time_of_day(input: &str) -> Result<TimeOfDay, TimeParseError> {
    let error = || TimeParseError {
        input: input.to_string(),
    };

    let parts = input
        .trim()
        .split(':')
        .map(|part| part.parse::<u32>().map_err(|_| error()))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [hour] => NaiveTime::from_hms_opt(*hour, 0, 0),
        [hour, minute] => NaiveTime::from_hms_opt(*hour, *minute, 0),
        [hour, minute, second] => NaiveTime::from_hms_opt(*hour, *minute, *second),
        _ => None,
    }
    .ok_or_else(error)
}

/// A daily interval during which tariff 1 applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffWindow {
    /// Inclusive
    pub start: TimeOfDay,
    /// Exclusive; `None` runs until midnight
    pub end: Option<TimeOfDay>,
}

impl TariffWindow {
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && self.end.map_or(true, |end| time < end)
    }
}

impl fmt::Display for TariffWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-midnight", self.start),
        }
    }
}

/// Advisory notice about redundant start times; merging carries on regardless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictWarning {
    /// A tariff 1 start while a tariff 1 window is already open; ignored
    RepeatedTariff1 {
        at: TimeOfDay,
        open_since: TimeOfDay,
    },
    /// A tariff 2 start while tariff 2 already applies
    RepeatedTariff2 {
        at: TimeOfDay,
        since: TimeOfDay,
    },
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictWarning::RepeatedTariff1 { at, open_since } => write!(
                f,
                "more than one consecutive tariff 1 time given: {}, \
                 already applying tariff 1 since {}",
                at, open_since
            ),
            ConflictWarning::RepeatedTariff2 { at, since } => write!(
                f,
                "more than one consecutive tariff 2 time given: {}, \
                 already applying tariff 2 since {}",
                at, since
            ),
        }
    }
}

/// Result of [`merge`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffSchedule {
    pub windows: Vec<TariffWindow>,
    pub warnings: Vec<ConflictWarning>,
}

impl TariffSchedule {
    /// True when tariff 1 applies at `time`
    pub fn is_tariff1(&self, time: TimeOfDay) -> bool {
        self.windows.iter().any(|window| window.contains(time))
    }

    fn warn(&mut self, warning: ConflictWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Merge tariff 1 and tariff 2 start times into tariff 1 windows.
///
/// At equal times a tariff 1 start is processed before a tariff 2 start.
/// A tariff 1 window left open at the end of the day runs until midnight.
pub fn merge(tariff1_starts: &[TimeOfDay], tariff2_starts: &[TimeOfDay]) -> TariffSchedule {
    let mut events: Vec<(TimeOfDay, bool)> = tariff1_starts
        .iter()
        .map(|&time| (time, true))
        .chain(tariff2_starts.iter().map(|&time| (time, false)))
        .collect();
    events.sort_by_key(|&(time, is_tariff1)| (time, !is_tariff1));

    let mut schedule = TariffSchedule::default();
    let mut running_start: Option<TimeOfDay> = None;
    let mut last_tariff2: Option<TimeOfDay> = None;

    for (time, is_tariff1) in events {
        if is_tariff1 {
            match running_start {
                None => running_start = Some(time),
                Some(open_since) => schedule.warn(ConflictWarning::RepeatedTariff1 {
                    at: time,
                    open_since,
                }),
            }
        } else {
            match running_start.take() {
                Some(start) => schedule.windows.push(TariffWindow {
                    start,
                    end: Some(time),
                }),
                None => {
                    if let Some(since) = last_tariff2 {
                        schedule.warn(ConflictWarning::RepeatedTariff2 { at: time, since });
                    }
                }
            }
            last_tariff2 = Some(time);
        }
    }

    if let Some(start) = running_start {
        schedule.windows.push(TariffWindow { start, end: None });
    }

    schedule
}
