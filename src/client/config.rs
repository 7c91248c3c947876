//! HTTP client configuration options.

use std::time::Duration;

/// Configuration for the REST client.
///
/// # Example
///
/// ```
/// use broker_cli::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://api.example.com")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_trailing_slash(base_url.into()),
            timeout: Duration::from_secs(30),
            user_agent: format!("broker-cli/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        let config = ClientConfig::new("https://api.example.com//");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn default_timeout() {
        let config = ClientConfig::new("https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
