//! Best-effort operator alerts.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`AlertConfig::from_env`] returns `None` and alerting stays off.

use crate::error::{Result, ThermometerError};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "thermometer@localhost";

/// Upper bound on a single delivery attempt.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Delivers a status message to an operator.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// Deliver one message. Callers treat failures as non-fatal.
    async fn deliver(&self, subject: &str, body: &str) -> Result<()>;
}

/// SMTP settings for [`EmailNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// Sender address
    pub from_address: String,
    /// Operator address
    pub to_address: String,
    /// Optional SMTP username
    pub smtp_user: Option<String>,
    /// Optional SMTP password
    pub smtp_password: Option<String>,
    /// Bound on each delivery
    pub timeout: Duration,
}

impl AlertConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default                  |
    /// |----------------------|----------|--------------------------|
    /// | `SMTP_HOST`          | yes      | -                        |
    /// | `SMTP_TO`            | yes      | -                        |
    /// | `SMTP_PORT`          | no       | `587`                    |
    /// | `SMTP_FROM`          | no       | `thermometer@localhost`  |
    /// | `SMTP_USER`          | no       | -                        |
    /// | `SMTP_PASSWORD`      | no       | -                        |
    /// | `ALERT_TIMEOUT_SECS` | no       | `10`                     |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AlertConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let smtp_host = lookup("SMTP_HOST")?;
        let to_address = lookup("SMTP_TO")?;
        Some(Self {
            smtp_host,
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
            timeout: Duration::from_secs(
                lookup("ALERT_TIMEOUT_SECS")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Sends alerts as plain-text email.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    timeout: Duration,
}

impl EmailNotifier {
    /// Validate addresses and build the SMTP transport.
    pub fn new(config: AlertConfig) -> Result<Self> {
        let from = config.from_address.parse::<Mailbox>().map_err(|e| {
            ThermometerError::config_error(format!("Invalid SMTP_FROM address: {}", e))
        })?;
        let to = config.to_address.parse::<Mailbox>().map_err(|e| {
            ThermometerError::config_error(format!("Invalid SMTP_TO address: {}", e))
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| ThermometerError::config_error(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .timeout(Some(config.timeout));

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl AlertNotifier for EmailNotifier {
    async fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ThermometerError::alert_error(format!("Cannot build email: {}", e)))?;

        match tokio::time::timeout(self.timeout, self.transport.send(email)).await {
            Ok(Ok(_)) => {
                info!(to = %self.to, subject, "Alert email sent");
                Ok(())
            }
            Ok(Err(e)) => Err(ThermometerError::alert_error(e.to_string())),
            Err(_) => Err(ThermometerError::alert_error(format!(
                "SMTP delivery timed out after {:?}",
                self.timeout
            ))),
        }
    }
}
