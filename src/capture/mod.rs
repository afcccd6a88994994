//! Capture resources: persisted readings grouped by thermometer.

pub mod registry;
pub mod service;
pub mod store;

pub use registry::ThermometerRegistry;
pub use service::ThermometerService;
pub use store::{Capture, CaptureStore};
