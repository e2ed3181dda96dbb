//! Transport configuration

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.example.com";

/// Upper bound on a single round trip; inference can be slow
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const BASE_URL_ENV: &str = "CHAT_API_BASE_URL";

/// Configuration for the inference endpoint client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Self {
        Self::from_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Blank overrides count as unset
    fn from_override(base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    #[allow(dead_code)] // Shorter bounds for tests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/llm/chat", self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
