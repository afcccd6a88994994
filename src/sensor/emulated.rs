//! Emulated sensor that synthesizes well-formed one-wire reports.

use crate::error::Result;
use crate::sensor::traits::SensorReader;
use std::time::{SystemTime, UNIX_EPOCH};

/// Period of the synthetic temperature wave.
const WAVE_PERIOD_SECS: f64 = 600.0;

/// Produces reports in the same format as a DS18B20, so the regular
/// parser runs on emulated data too.
#[derive(Debug, Clone)]
pub struct EmulatedReader {
    base_millidegrees: i64,
    amplitude_millidegrees: i64,
    calibration_offset: f64,
}

impl EmulatedReader {
    /// Oscillate slowly around `base_celsius` by up to `amplitude_celsius`.
    pub fn new(base_celsius: f64, amplitude_celsius: f64, calibration_offset: f64) -> Self {
        Self {
            base_millidegrees: (base_celsius * 1000.0).round() as i64,
            amplitude_millidegrees: (amplitude_celsius * 1000.0).round() as i64,
            calibration_offset,
        }
    }

    /// Always report exactly `celsius` before calibration.
    pub fn fixed(celsius: f64, calibration_offset: f64) -> Self {
        Self::new(celsius, 0.0, calibration_offset)
    }

    fn current_millidegrees(&self) -> i64 {
        if self.amplitude_millidegrees == 0 {
            return self.base_millidegrees;
        }
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        let phase = (secs / WAVE_PERIOD_SECS) * std::f64::consts::TAU;
        self.base_millidegrees + (phase.sin() * self.amplitude_millidegrees as f64).round() as i64
    }
}

impl Default for EmulatedReader {
    fn default() -> Self {
        Self::new(21.0, 1.5, 0.0)
    }
}

impl SensorReader for EmulatedReader {
    fn read_raw(&self) -> Result<String> {
        let value = self.current_millidegrees();
        Ok(format!(
            "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n72 01 4b 46 7f ff 0e 10 57 t={}\n",
            value
        ))
    }

    fn calibration(&self) -> f64 {
        self.calibration_offset
    }

    fn is_emulated(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_reader() {
        let reader = EmulatedReader::fixed(22.5, 0.5);
        assert!(reader.is_emulated());
        assert_eq!(reader.measure().unwrap().celsius(), 22.0);
    }

    #[test]
    fn test_wave_stays_within_amplitude() {
        let reader = EmulatedReader::new(20.0, 2.0, 0.0);
        for _ in 0..10 {
            let value = reader.measure().unwrap().celsius();
            assert!((18.0..=22.0).contains(&value), "value {} outside wave", value);
        }
    }
}
