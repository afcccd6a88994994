//! Traits for reading temperature sensors.

use crate::error::{Result, ThermometerError};
use crate::sensor::data::TemperatureReading;

/// Trait for obtaining calibrated temperatures from a sensor.
///
/// Implementations are blocking: a call returns once the source has produced
/// a report or failed. Async callers should run them on a blocking thread.
pub trait SensorReader: Send + Sync {
    /// Read one raw hardware report.
    fn read_raw(&self) -> Result<String>;

    /// Calibration offset subtracted from every reading.
    fn calibration(&self) -> f64;

    /// Whether this reader synthesizes data instead of touching hardware.
    fn is_emulated(&self) -> bool {
        false
    }

    /// Read and parse one report. Failures from either stage propagate unchanged.
    fn measure(&self) -> Result<TemperatureReading> {
        let raw = self.read_raw()?;
        parse_report(&raw, self.calibration())
    }
}

/// Parse a one-wire slave report into a calibrated reading.
///
/// The report must have at least two lines; the second line must have at
/// least ten whitespace-separated tokens, the tenth of which is `key=value`
/// with an integer milli-degree value.
pub fn parse_report(raw: &str, calibration_offset: f64) -> Result<TemperatureReading> {
    let line = raw.split('\n').nth(1).ok_or_else(|| {
        ThermometerError::malformed("report has fewer than two lines")
    })?;

    let token = line.split_whitespace().nth(9).ok_or_else(|| {
        ThermometerError::malformed(format!(
            "second line has fewer than ten tokens: {:?}",
            line
        ))
    })?;

    let (_, value) = token.split_once('=').ok_or_else(|| {
        ThermometerError::malformed(format!("token {:?} has no '=' separator", token))
    })?;

    let millidegrees = value.trim().parse::<i64>().map_err(|e| {
        ThermometerError::malformed(format!("invalid milli-degree value {:?}: {}", value, e))
    })?;

    Ok(TemperatureReading::from_millidegrees(
        millidegrees,
        calibration_offset,
    ))
}
