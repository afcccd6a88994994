//! DS18B20 one-wire sensor access through the kernel's w1 sysfs interface.

use crate::error::{Result, ThermometerError};
use crate::sensor::traits::SensorReader;
use std::fs;
use std::path::{Path, PathBuf};

/// Default sysfs directory holding one entry per detected one-wire device.
pub const W1_DEVICES_DIR: &str = "/sys/bus/w1/devices";

/// Family code prefix of DS18B20 temperature sensors.
const DS18B20_FAMILY: &str = "28-";

/// Reads a `w1_slave` report file.
#[derive(Debug, Clone)]
pub struct OneWireReader {
    path: PathBuf,
    calibration_offset: f64,
}

impl OneWireReader {
    /// Create a reader for the given `w1_slave` file.
    pub fn new(path: impl Into<PathBuf>, calibration_offset: f64) -> Self {
        Self {
            path: path.into(),
            calibration_offset,
        }
    }

    /// The report file this reader opens.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SensorReader for OneWireReader {
    fn read_raw(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            ThermometerError::hardware_unavailable(self.path.display().to_string(), e)
        })
    }

    fn calibration(&self) -> f64 {
        self.calibration_offset
    }
}

/// List the `w1_slave` files of all DS18B20 sensors under `devices_dir`.
pub fn discover_devices(devices_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let devices_dir = devices_dir.as_ref();
    let entries = fs::read_dir(devices_dir).map_err(|e| {
        ThermometerError::hardware_unavailable(devices_dir.display().to_string(), e)
    })?;

    let mut devices = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(DS18B20_FAMILY) {
            let slave = entry.path().join("w1_slave");
            if slave.exists() {
                devices.push(slave);
            }
        }
    }
    devices.sort();

    Ok(devices)
}
