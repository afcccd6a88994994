//! Periodic temperature monitoring with optional operator alerts.
//!
//! A [`Monitor`] measures one thermometer per tick, classifies the value
//! against its safe range and logs an `OK`, `WARNING` or `ERROR` message.
//! With alerting enabled the same message goes to an [`AlertNotifier`].

pub mod alert;
pub mod poller;

// Re-export commonly used items
pub use alert::{AlertConfig, AlertNotifier, EmailNotifier};
pub use poller::{Monitor, Status, TickReport};
