//! Main decoder API
//!
//! The [`Decoder`] turns the raw bytes of one log file into updates of a
//! [`SensorDataset`]. It performs no I/O: the caller reads the files and
//! feeds each sensor's files one after the other into that sensor's dataset.

use crate::config::DecoderConfig;
use crate::dataset::SensorDataset;
use crate::formats::{header, records, BlockKind};
use crate::types::{DecoderError, Result};

/// Entry point for decoding energy logger files
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the default one-minute cadence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one file's bytes and merge them into `dataset`.
    ///
    /// The whole block is parsed before the dataset is touched, so a failing
    /// call leaves `dataset` exactly as it was.
    ///
    /// # Example
    /// ```
    /// use energy_logger_decoder::{BlockKind, Decoder, SensorDataset};
    ///
    /// let decoder = Decoder::new();
    /// let mut dataset = SensorDataset::new();
    /// let stream = [0x08, 0xFC, 0x01, 0xF4, 0x5F, 0xFF, 0xFF, 0xFF];
    ///
    /// let kind = decoder.accumulate(&mut dataset, &stream).unwrap();
    /// assert_eq!(kind, BlockKind::Records);
    /// assert_eq!(dataset.records().len(), 1);
    /// ```
    pub fn accumulate(&self, dataset: &mut SensorDataset, data: &[u8]) -> Result<BlockKind> {
        let interval = self.config.sample_interval()?;
        let kind = BlockKind::detect(data);

        match kind {
            BlockKind::Header => {
                if let Some(sensor_id) = dataset.sensor_id() {
                    return Err(DecoderError::DuplicateHeader { sensor_id });
                }
                let header = header::parse(data)?;
                log::debug!(
                    "Decoded header block for sensor {} ({:.3} kWh total)",
                    header.sensor_id,
                    header.total_energy_kwh
                );
                dataset.merge_header(header, interval)?;
            }
            BlockKind::Records => {
                let decoded = records::parse(data, interval)?;
                log::debug!("Decoded {} record(s) from record stream", decoded.len());
                dataset.merge_records(decoded, interval);
            }
        }

        Ok(kind)
    }
}
