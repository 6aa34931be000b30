use std::time::Duration;

use anyhow::{bail, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub allow_insecure: bool,
}

impl ApiConfig {
    /// Build a config, normalizing the base URL (no trailing slash) and
    /// rejecting plain HTTP unless `allow_insecure` is set.
    pub fn new(base_url: &str, allow_insecure: bool) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url, allow_insecure)?;
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            allow_insecure,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join a path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Reject non-HTTPS base URLs unless `allow_insecure` is set.
fn validate_base_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
    }
    bail!("Invalid API URL scheme: {url}\nExpected an https:// URL.");
}
