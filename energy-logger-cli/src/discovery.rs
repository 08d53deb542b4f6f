//! Mapping log file names to sensors
//!
//! The logger names its files after the sensor that wrote them: the first
//! letter `A` is sensor 0, `B` sensor 1 and so on up to `J` for sensor 9.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors raised while mapping file names to sensors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Cannot derive a sensor id from file name {0:?}")]
    UnnamedFile(PathBuf),

    #[error("File {path:?} does not belong to a sensor: first letter {letter:?} is outside A..J")]
    UnknownSensor { path: PathBuf, letter: char },
}

/// Letter naming sensor 0
const FIRST_SENSOR_LETTER: char = 'A';

/// Sensor id encoded in a log file name
pub fn sensor_id_for(path: &Path) -> Result<u8, DiscoveryError> {
    let letter = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.chars().next())
        .ok_or_else(|| DiscoveryError::UnnamedFile(path.to_path_buf()))?
        .to_ascii_uppercase();

    let id = u32::from(letter).wrapping_sub(u32::from(FIRST_SENSOR_LETTER));
    if id > 9 {
        return Err(DiscoveryError::UnknownSensor {
            path: path.to_path_buf(),
            letter,
        });
    }
    Ok(id as u8)
}

/// Group files by sensor id, keeping the argument order within each sensor
pub fn group_by_sensor(files: &[PathBuf]) -> Result<BTreeMap<u8, Vec<PathBuf>>, DiscoveryError> {
    let mut groups: BTreeMap<u8, Vec<PathBuf>> = BTreeMap::new();
    for path in files {
        let sensor_id = sensor_id_for(path)?;
        log::debug!("{:?} belongs to sensor {}", path, sensor_id);
        groups.entry(sensor_id).or_default().push(path.clone());
    }
    Ok(groups)
}
