//! Data structures for thermometers and their readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A calibrated temperature in degrees Celsius.
///
/// Produced once by the report parser and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TemperatureReading {
    celsius: f64,
}

impl TemperatureReading {
    /// Wrap an already calibrated value.
    pub fn new(celsius: f64) -> Self {
        Self { celsius }
    }

    /// Build a reading from the driver's milli-degree value minus the calibration offset.
    pub fn from_millidegrees(millidegrees: i64, calibration_offset: f64) -> Self {
        Self::new(millidegrees as f64 / 1000.0 - calibration_offset)
    }

    /// The reading in degrees Celsius.
    pub fn celsius(&self) -> f64 {
        self.celsius
    }
}

impl fmt::Display for TemperatureReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.celsius)
    }
}

/// Inclusive band of acceptable temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeRange {
    /// Lowest acceptable temperature in Celsius
    pub min: f64,
    /// Highest acceptable temperature in Celsius
    pub max: f64,
}

impl SafeRange {
    /// Create a new safe range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range, both ends included.
    pub fn contains(&self, value: f64) -> bool {
        super::threshold::classify(value, self.min, self.max)
    }
}

/// Plain description of one sensor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thermometer {
    /// Stable identifier, also used as the capture directory name
    pub id: String,
    /// Correction subtracted from every raw value
    pub calibration_offset: f64,
    /// Range used to classify readings as OK or WARNING
    pub safe_range: SafeRange,
    /// Whether readings are synthesized instead of read from hardware
    pub emulated: bool,
}
