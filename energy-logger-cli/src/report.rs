//! Report generation
//!
//! Renders decoded sensors either as a plain text dump or as JSON.

use energy_logger_decoder::{CostPoint, SensorDataset, TariffSchedule};
use serde::Serialize;
use std::fmt::Write;

/// Everything shown for one sensor
#[derive(Debug, Serialize)]
pub struct SensorReport {
    pub sensor_id: u8,
    pub dataset: SensorDataset,
    pub costs: Vec<CostPoint>,
}

impl SensorReport {
    pub fn total_cost(&self) -> f64 {
        self.costs.last().map_or(0.0, |point| point.running_total)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tariff: &'a TariffSchedule,
    sensors: &'a [SensorReport],
}

/// Render all sensors as pretty-printed JSON
pub fn render_json(
    schedule: &TariffSchedule,
    sensors: &[SensorReport],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        tariff: schedule,
        sensors,
    })
}

/// Render all sensors as a text dump
pub fn render_text(schedule: &TariffSchedule, sensors: &[SensorReport]) -> String {
    let mut out = String::new();

    if schedule.windows.is_empty() {
        out.push_str("tariff 1: never\n");
    } else {
        let windows: Vec<String> = schedule.windows.iter().map(|w| w.to_string()).collect();
        let _ = writeln!(out, "tariff 1: {}", windows.join(", "));
    }

    for report in sensors {
        write_sensor(&mut out, report);
    }
    out
}

fn write_sensor(out: &mut String, report: &SensorReport) {
    let dataset = &report.dataset;

    match dataset.header() {
        Some(header) => {
            let _ = writeln!(
                out,
                "sensor {} recorded={} on={} tariff1={:.3} tariff2={:.3} since={}",
                header.sensor_id,
                header.recorded_hours,
                header.on_hours,
                header.tariff1_rate,
                header.tariff2_rate,
                header.since
            );
            for (day, total) in header.daily_totals.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "day-{}: {:.3}kWh {} {}",
                    day, total.energy_kwh, total.recorded_minutes, total.on_minutes
                );
            }
            let _ = writeln!(out, "Total: {:.3}kWh", header.total_energy_kwh);
        }
        None => {
            let _ = writeln!(out, "sensor {} (no header file)", report.sensor_id);
        }
    }

    for record in dataset.records() {
        let timestamp = record
            .timestamp
            .map_or_else(|| "unknown".to_string(), |t| t.to_string());
        let _ = writeln!(
            out,
            " {}  {:5.1}V {:7.3}A {:.2}cosPhi {:8.2}W {:8.2}VA",
            timestamp,
            record.voltage,
            record.current,
            record.power_factor,
            record.active_power_w(),
            record.apparent_power_va()
        );
    }

    if !report.costs.is_empty() {
        let _ = writeln!(out, "Cost: {:.4}", report.total_cost());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_logger_decoder::tariff::{merge, parse_time_of_day};
    use energy_logger_decoder::Decoder;

    fn records_only() -> SensorReport {
        let mut dataset = SensorDataset::new();
        Decoder::new()
            .accumulate(
                &mut dataset,
                &[0xE0, 0xC5, 0xEA, 1, 2, 24, 3, 4, 0x08, 0xFC, 0x01, 0xF4, 0x64, 0xFF, 0xFF, 0xFF],
            )
            .unwrap();
        SensorReport {
            sensor_id: 5,
            dataset,
            costs: Vec::new(),
        }
    }

    #[test]
    fn test_text_report_without_header() {
        let schedule = merge(
            &[parse_time_of_day("22").unwrap()],
            &[parse_time_of_day("6").unwrap()],
        );
        let text = render_text(&schedule, &[records_only()]);

        assert_eq!(
            text,
            "tariff 1: 22:00:00-midnight\n\
             sensor 5 (no header file)\n \
             2024-01-02 03:04:00  230.0V   0.500A 1.00cosPhi   115.00W   115.00VA\n"
        );
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&TariffSchedule::default(), &[records_only()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sensors"][0]["sensor_id"], 5);
        assert_eq!(value["sensors"][0]["dataset"]["records"][0]["voltage"], 230.0);
        assert!(value["tariff"]["windows"].as_array().unwrap().is_empty());
    }
}
