//! Session configuration: target hosts and HTTP client settings.

use std::time::Duration;

use crate::request::BaseUrl;

/// Base URLs for the two hosts the API is split across.
///
/// Set once when the session is built and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub api_url: String,
    pub upload_url: String,
}

impl Environment {
    pub fn new(api_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            upload_url: upload_url.into(),
        }
    }

    /// Production Twitter hosts.
    pub fn twitter() -> Self {
        Self::new("https://api.twitter.com", "https://upload.twitter.com")
    }

    pub fn base_url(&self, which: BaseUrl) -> &str {
        match which {
            BaseUrl::Api => &self.api_url,
            BaseUrl::Upload => &self.upload_url,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::twitter()
    }
}

/// Settings for the default reqwest transport.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Total time allowed for one request.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("twapi-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
