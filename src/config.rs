//! Application configuration: thermometers, capture storage and monitoring.
//!
//! Configuration is either loaded from a JSON document or assembled from
//! command line flags by the binary. Nothing here is read by the core logic
//! implicitly; every value is passed down explicitly.

use crate::error::{Result, ThermometerError};
use crate::sensor::{EmulatedReader, OneWireReader, SafeRange, SensorReader, Thermometer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Where a thermometer's reports come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorSource {
    /// A `w1_slave` file exposed by the kernel one-wire driver
    OneWire { path: PathBuf },
    /// Synthesized reports around a base temperature
    Emulated {
        #[serde(default = "default_emulated_base")]
        base_celsius: f64,
        #[serde(default)]
        amplitude_celsius: f64,
    },
}

fn default_emulated_base() -> f64 {
    21.0
}

/// Configuration of a single thermometer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermometerConfig {
    /// Thermometer identifier
    pub id: String,
    /// Correction subtracted from raw values
    #[serde(default)]
    pub calibration_offset: f64,
    /// Inclusive safe range
    pub safe_range: SafeRange,
    /// Report source
    pub source: SensorSource,
}

impl ThermometerConfig {
    /// Create a thermometer reading the given `w1_slave` file.
    pub fn one_wire(id: impl Into<String>, path: impl Into<PathBuf>, safe_range: SafeRange) -> Self {
        Self {
            id: id.into(),
            calibration_offset: 0.0,
            safe_range,
            source: SensorSource::OneWire { path: path.into() },
        }
    }

    /// Create an emulated thermometer.
    pub fn emulated(id: impl Into<String>, base_celsius: f64, safe_range: SafeRange) -> Self {
        Self {
            id: id.into(),
            calibration_offset: 0.0,
            safe_range,
            source: SensorSource::Emulated {
                base_celsius,
                amplitude_celsius: 0.0,
            },
        }
    }

    /// Set the calibration offset.
    pub fn with_calibration(mut self, calibration_offset: f64) -> Self {
        self.calibration_offset = calibration_offset;
        self
    }

    /// The plain descriptor for this thermometer.
    pub fn descriptor(&self) -> Thermometer {
        Thermometer {
            id: self.id.clone(),
            calibration_offset: self.calibration_offset,
            safe_range: self.safe_range,
            emulated: matches!(self.source, SensorSource::Emulated { .. }),
        }
    }

    /// Build the sensor reader for this thermometer's source.
    pub fn reader(&self) -> Arc<dyn SensorReader> {
        match &self.source {
            SensorSource::OneWire { path } => {
                Arc::new(OneWireReader::new(path.clone(), self.calibration_offset))
            }
            SensorSource::Emulated {
                base_celsius,
                amplitude_celsius,
            } => Arc::new(EmulatedReader::new(
                *base_celsius,
                *amplitude_celsius,
                self.calibration_offset,
            )),
        }
    }
}

/// Configuration of the periodic monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Delay between the end of one tick and the start of the next, in seconds
    pub interval_secs: u64,
    /// Whether tick messages are forwarded to the alert notifier
    #[serde(default)]
    pub alerting: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: crate::DEFAULT_INTERVAL_SECS,
            alerting: false,
        }
    }
}

impl MonitorConfig {
    /// The poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory of capture storage
    pub data_dir: PathBuf,
    /// All known thermometers
    pub thermometers: Vec<ThermometerConfig>,
    /// Monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ThermometerError::config_error(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ThermometerError::config_error(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the rest of the crate cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.thermometers.is_empty() {
            return Err(ThermometerError::config_error("No thermometers configured"));
        }
        if self.monitor.interval_secs == 0 {
            return Err(ThermometerError::config_error(
                "Poll interval must be at least one second",
            ));
        }

        let mut seen = HashSet::new();
        for thermometer in &self.thermometers {
            if !is_path_safe_id(&thermometer.id) {
                return Err(ThermometerError::config_error(format!(
                    "Invalid thermometer id {:?}",
                    thermometer.id
                )));
            }
            if !seen.insert(thermometer.id.as_str()) {
                return Err(ThermometerError::config_error(format!(
                    "Duplicate thermometer id {:?}",
                    thermometer.id
                )));
            }
            let range = thermometer.safe_range;
            if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
                return Err(ThermometerError::config_error(format!(
                    "Thermometer {}: min {} is above max {}",
                    thermometer.id, range.min, range.max
                )));
            }
        }

        Ok(())
    }
}

/// Ids double as directory names, so only a conservative character set is allowed.
fn is_path_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
