//! Core types for the energy logger decoder library
//!
//! This module defines the error taxonomy and the shared timestamp type. Every
//! fatal decode failure carries the byte offset and the field being read so the
//! caller can report exactly which part of which file was malformed.

use chrono::NaiveDateTime;
use std::fmt;

/// Timestamp type used throughout the decoder.
///
/// The logger records wall-clock time without any zone information.
pub type Timestamp = NaiveDateTime;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Broad class of a [`DecoderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad magic, trailer, digit or truncated stream
    Format,
    /// A value outside its permitted range
    Range,
    /// The operation conflicts with what the dataset already holds
    State,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Format => write!(f, "format"),
            ErrorKind::Range => write!(f, "range"),
            ErrorKind::State => write!(f, "state"),
        }
    }
}

/// Errors that can occur during decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecoderError {
    #[error("Truncated data while reading {field} at offset {offset}: need {needed} byte(s), {remaining} left")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Bad header trailer at offset {offset}: expected {}, got {}", hex(.expected), hex(.actual))]
    BadTrailer {
        offset: usize,
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    #[error("Invalid decimal digit 0x{value:02X} in {field} at offset {offset}")]
    InvalidDigit {
        field: &'static str,
        offset: usize,
        value: u8,
    },

    #[error("Invalid {field} at offset {offset}: {} is not a calendar date/time", hex(.bytes))]
    InvalidTimestamp {
        field: &'static str,
        offset: usize,
        bytes: Vec<u8>,
    },

    #[error("Sensor id {value} at offset {offset} is outside 0..=9")]
    SensorIdOutOfRange { offset: usize, value: u8 },

    #[error("Sample interval of {secs} s is outside 1..={max} s")]
    SampleIntervalOutOfRange { secs: i64, max: i64 },

    #[error("Duplicate header block for sensor {sensor_id}")]
    DuplicateHeader { sensor_id: u8 },
}

impl DecoderError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecoderError::Truncated { .. }
            | DecoderError::BadTrailer { .. }
            | DecoderError::InvalidDigit { .. }
            | DecoderError::InvalidTimestamp { .. } => ErrorKind::Format,
            DecoderError::SensorIdOutOfRange { .. }
            | DecoderError::SampleIntervalOutOfRange { .. } => ErrorKind::Range,
            DecoderError::DuplicateHeader { .. } => ErrorKind::State,
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<nothing>".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
