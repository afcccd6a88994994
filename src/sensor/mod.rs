//! Temperature sensor access and reading classification.
//!
//! Hardware sensors and the emulated variant share one [`SensorReader`]
//! trait; both produce a raw one-wire report that goes through the same
//! parser before a calibrated [`TemperatureReading`] comes out.

pub mod data;
pub mod emulated;
pub mod one_wire;
pub mod threshold;
pub mod traits;

// Re-export commonly used items
pub use data::{SafeRange, TemperatureReading, Thermometer};
pub use emulated::EmulatedReader;
pub use one_wire::{discover_devices, OneWireReader};
pub use threshold::classify;
pub use traits::{parse_report, SensorReader};
