//! Configuration loading and parsing

use anyhow::{Context, Result};
use energy_logger_decoder::tariff::{parse_time_of_day, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Daily tariff start times, each `hh[:mm[:ss]]`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TariffConfig {
    #[serde(default)]
    pub tariff1: Vec<String>,
    #[serde(default)]
    pub tariff2: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl TariffConfig {
    /// Parse the configured start times
    pub fn start_times(&self) -> Result<(Vec<TimeOfDay>, Vec<TimeOfDay>)> {
        let parse = |values: &[String], name: &str| -> Result<Vec<TimeOfDay>> {
            values
                .iter()
                .map(|value| {
                    parse_time_of_day(value)
                        .with_context(|| format!("Invalid {} start time in config", name))
                })
                .collect()
        };
        Ok((
            parse(self.tariff1.as_slice(), "tariff1")?,
            parse(self.tariff2.as_slice(), "tariff2")?,
        ))
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // Reject bad times up front rather than after decoding every file.
    config.tariff.start_times()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [tariff]
            tariff1 = ["22:00"]
            tariff2 = ["06:30", "12"]

            [output]
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.tariff.tariff1, vec!["22:00"]);
        assert_eq!(config.output.format, OutputFormat::Json);

        let (tariff1, tariff2) = config.tariff.start_times().unwrap();
        assert_eq!(tariff1.len(), 1);
        assert_eq!(tariff2[1].to_string(), "12:00:00");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.tariff.tariff1.is_empty());
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_config_rejects_bad_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tariff]\ntariff1 = [\"25:00\"]").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("25:00"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tariff]\ntariff2 = [\"07:00\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tariff.tariff2, vec!["07:00"]);
    }
}
