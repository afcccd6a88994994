//! Shared state handed to every handler.

use crate::capture::ThermometerRegistry;
use axum::http::{header::HOST, HeaderMap};
use std::sync::Arc;

/// Registry plus link settings, cloned into each request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// All thermometers served by the API
    pub registry: Arc<ThermometerRegistry>,
    /// Configured link base, already stripped of a trailing `/`
    pub public_url: Option<String>,
}

impl AppState {
    /// Create the state for one router.
    pub fn new(registry: Arc<ThermometerRegistry>, public_url: Option<String>) -> Self {
        Self {
            registry,
            public_url,
        }
    }

    /// Scheme and authority for absolute links.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.public_url {
            return url.clone();
        }
        let host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{}", host)
    }
}

/// `<base>/thermometers/<id>`
pub fn thermometer_url(base: &str, thermometer: &str) -> String {
    format!("{}/thermometers/{}", base, thermometer)
}

/// `<base>/thermometers/<id>/temperatures/`
pub fn temperatures_url(base: &str, thermometer: &str) -> String {
    format!("{}/thermometers/{}/temperatures/", base, thermometer)
}

/// `<base>/thermometers/<id>/temperatures/<capture>`
pub fn temperature_url(base: &str, thermometer: &str, capture: &str) -> String {
    format!("{}/thermometers/{}/temperatures/{}", base, thermometer, capture)
}
