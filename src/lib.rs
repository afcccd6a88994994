//! # Pi Thermometer - One-wire temperature monitoring for Raspberry Pi
//!
//! Reads DS18B20 sensors through the kernel's w1 interface, watches them
//! against a safe range and serves captured readings over a small REST API.
//!
//! ## Features
//!
//! - **Sensor parsing**: raw `w1_slave` reports to calibrated readings
//! - **Monitoring**: fixed-delay polling with OK/WARNING/ERROR logging and email alerts
//! - **Captures**: on-demand readings stored as flat files, one directory per thermometer
//! - **Resource API**: list, create, fetch and delete captures over HTTP
//! - **Emulation**: synthetic sensors for development off the Pi
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pi_thermometer::{start_web_server, AppConfig, ThermometerRegistry, WebConfig};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_json_file("thermometer.json")?;
//!     let registry = Arc::new(ThermometerRegistry::from_config(&config)?);
//!
//!     start_web_server(WebConfig::default(), registry, CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod monitor;
pub mod sensor;
pub mod web;

// Re-export public API
pub use capture::{Capture, CaptureStore, ThermometerRegistry, ThermometerService};
pub use config::{AppConfig, MonitorConfig, SensorSource, ThermometerConfig};
pub use error::{Result, ThermometerError};
pub use monitor::{AlertConfig, AlertNotifier, EmailNotifier, Monitor, Status, TickReport};
pub use sensor::{
    classify, parse_report, EmulatedReader, OneWireReader, SafeRange, SensorReader,
    TemperatureReading, Thermometer,
};
pub use web::{create_app, start_web_server, WebConfig};

/// The default poll interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 5000;

/// The default thermometer id
pub const DEFAULT_THERMOMETER_ID: &str = "w1";

/// The default DS18B20 report file
pub const DEFAULT_SENSOR_PATH: &str = "/sys/bus/w1/devices/28-000007a6f1c4/w1_slave";
