//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What happens when a listener returns an error during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerFailurePolicy {
    /// Keep dispatching, then report every failure in one error.
    #[default]
    Collect,
    /// Stop the navigation at the first failure. The address is not pushed.
    Abort,
}

/// Configuration for a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use oxide_nav::{ListenerFailurePolicy, RouterConfig};
///
/// let config = RouterConfig::from_json(
///     r#"{ "base_url": "https://example.com/shop", "listener_failure": "abort" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.base_url.as_deref(), Some("https://example.com/shop"));
/// assert_eq!(config.listener_failure, ListenerFailurePolicy::Abort);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Explicit base URL. Overrides the host's cached base URL.
    pub base_url: Option<String>,
    /// Listener failure handling.
    pub listener_failure: ListenerFailurePolicy,
}

impl RouterConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the listener failure policy.
    #[must_use]
    pub fn listener_failure(mut self, policy: ListenerFailurePolicy) -> Self {
        self.listener_failure = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RouterConfig::from_json("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.listener_failure, ListenerFailurePolicy::Collect);
    }

    #[test]
    fn test_builder() {
        let config = RouterConfig::new()
            .base_url("http://localhost/app")
            .listener_failure(ListenerFailurePolicy::Abort);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost/app"));
        assert_eq!(config.listener_failure, ListenerFailurePolicy::Abort);
    }

    #[test]
    fn test_malformed_document() {
        let err = RouterConfig::from_json(r#"{ "listener_failure": "retry" }"#).unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
