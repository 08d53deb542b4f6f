//! Electricity cost per record
//!
//! Each record covers one sample interval. Its cost is the applicable rate
//! times the energy drawn during that interval; tariff 1 applies inside the
//! schedule's windows and tariff 2 everywhere else.

use crate::dataset::SensorDataset;
use crate::tariff::TariffSchedule;
use crate::types::Timestamp;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Cost attributed to one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
    pub timestamp: Timestamp,
    /// Currency per kWh applied to this record
    pub rate: f64,
    pub cost: f64,
    /// Sum of `cost` over this and all earlier points
    pub running_total: f64,
}

/// Cost of every timestamped record of `dataset`, in series order.
///
/// Returns nothing until the dataset has a header, since the rates live there.
pub fn cost_series(
    dataset: &SensorDataset,
    schedule: &TariffSchedule,
    interval: TimeDelta,
) -> Vec<CostPoint> {
    let (Some(tariff1_rate), Some(tariff2_rate)) =
        (dataset.tariff1_rate(), dataset.tariff2_rate())
    else {
        return Vec::new();
    };
    let interval_hours = interval.num_seconds() as f64 / 3600.0;

    let mut running_total = 0.0;
    dataset
        .records()
        .iter()
        .filter_map(|record| {
            let timestamp = record.timestamp?;
            let rate = if schedule.is_tariff1(timestamp.time()) {
                tariff1_rate
            } else {
                tariff2_rate
            };
            let energy_kwh = record.active_power_w() / 1000.0 * interval_hours;
            let cost = rate * energy_kwh;
            running_total += cost;
            Some(CostPoint {
                timestamp,
                rate,
                cost,
                running_total,
            })
        })
        .collect()
}

/// Total cost of every timestamped record of `dataset`
pub fn total_cost(
    dataset: &SensorDataset,
    schedule: &TariffSchedule,
    interval: TimeDelta,
) -> f64 {
    cost_series(dataset, schedule, interval)
        .last()
        .map_or(0.0, |point| point.running_total)
}
