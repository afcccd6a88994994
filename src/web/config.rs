//! Web server configuration.

/// Listener and link settings for the resource API.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Whether responses carry permissive CORS headers
    pub enable_cors: bool,
    /// Base used for absolute resource links; the request's Host header when unset
    pub public_url: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", crate::DEFAULT_WEB_PORT)
    }
}

impl WebConfig {
    /// Listen on `host:port` with CORS enabled and Host-derived links.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            enable_cors: true,
            public_url: None,
        }
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    /// Set the public base URL used in links, e.g. `http://pi.local:5000`.
    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        self.public_url = url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    /// `host:port` as handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_loses_trailing_slash() {
        let config = WebConfig::new("127.0.0.1", 8080)
            .with_public_url(Some("http://pi.local:5000/".to_string()));
        assert_eq!(config.public_url.as_deref(), Some("http://pi.local:5000"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
