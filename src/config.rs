//! Download configuration

use std::time::Duration;

/// Host of the public DocSend service
pub const DEFAULT_HOST: &str = "https://docsend.com";

/// Network and concurrency configuration for a download run
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Document-service host, used for the view URL and for absolutizing tracked links
    pub host: String,
    /// Maximum number of pages fetched at the same time (default: 8)
    pub concurrency: usize,
    /// Per-request timeout (default: none)
    pub request_timeout: Option<Duration>,
    /// Maximum size of a single page image in bytes (default: 64MB)
    pub max_image_bytes: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            concurrency: 8,
            request_timeout: None,
            max_image_bytes: 64 * 1024 * 1024, // 64MB
            user_agent: concat!("docsend-dl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DownloadConfig {
    /// Host without a trailing slash, ready for path concatenation.
    pub fn host(&self) -> &str {
        self.host.trim_end_matches('/')
    }

    /// Worker limit, never below one.
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = DownloadConfig::default();
        assert_eq!(config.host(), "https://docsend.com");
        assert_eq!(config.concurrency(), 8);
        assert!(config.request_timeout.is_none());
        assert!(config.user_agent.starts_with("docsend-dl/"));
    }

    #[test]
    fn test_host_trailing_slash_trimmed() {
        let config = DownloadConfig {
            host: "http://127.0.0.1:8080/".to_string(),
            ..DownloadConfig::default()
        };
        assert_eq!(config.host(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let config = DownloadConfig {
            concurrency: 0,
            ..DownloadConfig::default()
        };
        assert_eq!(config.concurrency(), 1);
    }
}
