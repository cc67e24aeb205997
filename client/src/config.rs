//! Client settings, with defaults and an environment overlay.

use std::time::Duration;

use dti_core::DEFAULT_BASE_URL;

pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(3600);
pub const MIN_CACHE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("dti/", env!("CARGO_PKG_VERSION"));

/// Settings for a [`crate::Client`].
///
/// ```
/// use std::time::Duration;
/// let config = dti::ClientConfig::default()
///     .base_url("http://localhost:3000/api")
///     .cache_timeout(Duration::from_secs(60));
/// assert_eq!(config.base_url, "http://localhost:3000/api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// How long the species/color/pose cache stays fresh. Never below
    /// [`MIN_CACHE_TIMEOUT`].
    pub cache_timeout: Duration,
    pub proxy: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
            proxy: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout.max(MIN_CACHE_TIMEOUT);
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Defaults overridden by `DTI_BASE_URL`, `DTI_CACHE_TIMEOUT_SECS`,
    /// `DTI_PROXY` and `DTI_REQUEST_TIMEOUT_SECS`.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup("DTI_BASE_URL") {
            config = config.base_url(base_url);
        }
        if let Some(secs) = seconds(&lookup, "DTI_CACHE_TIMEOUT_SECS") {
            config = config.cache_timeout(secs);
        }
        if let Some(proxy) = lookup("DTI_PROXY").filter(|p| !p.is_empty()) {
            config = config.proxy(proxy);
        }
        if let Some(secs) = seconds(&lookup, "DTI_REQUEST_TIMEOUT_SECS") {
            config = config.request_timeout(secs);
        }
        config
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid duration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> ClientConfig {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_timeout, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.proxy.is_none());
        assert!(config.user_agent.starts_with("dti/"));
    }

    #[test]
    fn cache_timeout_has_a_floor() {
        let config = ClientConfig::default().cache_timeout(Duration::from_secs(1));
        assert_eq!(config.cache_timeout, MIN_CACHE_TIMEOUT);
    }

    #[test]
    fn environment_overrides() {
        let config = from_map(&[
            ("DTI_BASE_URL", "http://localhost:3000/api"),
            ("DTI_CACHE_TIMEOUT_SECS", "120"),
            ("DTI_PROXY", "http://proxy:8080"),
            ("DTI_REQUEST_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.cache_timeout, Duration::from_secs(120));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_numbers_keep_defaults() {
        let config = from_map(&[("DTI_CACHE_TIMEOUT_SECS", "soon"), ("DTI_PROXY", "")]);
        assert_eq!(config, ClientConfig::default());
    }
}
