//! Error handling for the thermometer crate.

/// A specialized `Result` type for thermometer operations.
pub type Result<T> = std::result::Result<T, ThermometerError>;

/// The main error type for sensor, capture and alert operations.
#[derive(Debug, thiserror::Error)]
pub enum ThermometerError {
    /// The hardware report source could not be opened or read
    #[error("Sensor hardware unavailable at {path}: {source}")]
    HardwareUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The hardware report did not have the expected shape
    #[error("Malformed sensor reading: {0}")]
    MalformedReading(String),

    /// No thermometer is registered under this id
    #[error("Thermometer not found: {0}")]
    InvalidThermometer(String),

    /// No capture with this id exists for the thermometer
    #[error("Capture {capture} not found for thermometer {thermometer}")]
    CaptureNotFound { thermometer: String, capture: String },

    /// An alert could not be delivered
    #[error("Alert delivery failed: {0}")]
    AlertDeliveryFailed(String),

    /// Capture storage I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Generic system error
    #[error("System error: {0}")]
    System(String),
}

impl ThermometerError {
    /// Create a new hardware-unavailable error for the given source path
    pub fn hardware_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::HardwareUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a new malformed-reading error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedReading(msg.into())
    }

    /// Create a new invalid-thermometer error
    pub fn invalid_thermometer(id: impl Into<String>) -> Self {
        Self::InvalidThermometer(id.into())
    }

    /// Create a new capture-not-found error
    pub fn capture_not_found(thermometer: impl Into<String>, capture: impl Into<String>) -> Self {
        Self::CaptureNotFound {
            thermometer: thermometer.into(),
            capture: capture.into(),
        }
    }

    /// Create a new alert delivery error
    pub fn alert_error(msg: impl Into<String>) -> Self {
        Self::AlertDeliveryFailed(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new generic system error
    #[allow(clippy::self_named_constructors)]
    pub fn system_error(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// Whether the client addressed a resource that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidThermometer(_) | Self::CaptureNotFound { .. }
        )
    }
}
