//! Periodic measurement loop.

use crate::capture::ThermometerService;
use crate::config::MonitorConfig;
use crate::monitor::alert::AlertNotifier;
use crate::sensor::TemperatureReading;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Outcome class of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warning => write!(f, "WARNING"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

/// What a single tick observed.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub thermometer: String,
    pub status: Status,
    pub value: Option<TemperatureReading>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TickReport {
    /// Alert subject line.
    pub fn subject(&self) -> String {
        format!("[{}] {}", self.thermometer, self.status)
    }

    /// Alert body.
    pub fn body(&self) -> String {
        format!("{}\nTime: {}", self.message, self.timestamp.to_rfc3339())
    }
}

/// Polls one thermometer forever, or until cancelled.
///
/// Every failure is confined to its tick: it is logged, optionally alerted,
/// and the loop carries on after the usual delay.
pub struct Monitor {
    service: ThermometerService,
    config: MonitorConfig,
    notifier: Option<Arc<dyn AlertNotifier>>,
}

impl Monitor {
    /// Monitor `service` with alerting off until a notifier is attached.
    pub fn new(service: ThermometerService, config: MonitorConfig) -> Self {
        Self {
            service,
            config,
            notifier: None,
        }
    }

    /// Attach the notifier used when alerting is enabled.
    pub fn with_notifier(mut self, notifier: Arc<dyn AlertNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Run ticks separated by the configured delay until `cancel` fires.
    ///
    /// The delay counts from the end of one tick to the start of the next.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            thermometer = self.service.id(),
            interval_secs = self.config.interval_secs,
            alerting = self.config.alerting,
            "Monitor started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.tick() => {}
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }

        info!(thermometer = self.service.id(), "Monitor stopped");
    }

    /// Measure once, classify, log and optionally alert.
    pub async fn tick(&self) -> TickReport {
        let thermometer = self.service.thermometer();

        let (status, value, message) = match self.service.measure().await {
            Ok(reading) => {
                if thermometer.safe_range.contains(reading.celsius()) {
                    (Status::Ok, Some(reading), format!("OK, value={}", reading))
                } else {
                    (Status::Warning, Some(reading), format!("WARNING, value={}", reading))
                }
            }
            Err(e) => (Status::Error, None, format!("ERROR, {}", e)),
        };

        let report = TickReport {
            thermometer: thermometer.id.clone(),
            status,
            value,
            message,
            timestamp: Utc::now(),
        };

        match report.status {
            Status::Ok => info!(thermometer = %report.thermometer, "{}", report.message),
            Status::Warning => warn!(thermometer = %report.thermometer, "{}", report.message),
            Status::Error => error!(thermometer = %report.thermometer, "{}", report.message),
        }

        if self.config.alerting {
            if let Some(notifier) = &self.notifier {
                if let Err(e) = notifier.deliver(&report.subject(), &report.body()).await {
                    warn!(thermometer = %report.thermometer, error = %e, "Alert not delivered");
                }
            }
        }

        report
    }
}
