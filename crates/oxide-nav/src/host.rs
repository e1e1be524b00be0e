//! The environment a router runs in.

use parking_lot::Mutex;

/// Services the router consumes from its host environment.
///
/// A browser shell, a desktop webview or a test harness implements this
/// trait and hands it to [`Router::new`](crate::Router::new).
pub trait Host: Send + Sync {
    /// Returns the full URL of the active page.
    fn current_url(&self) -> String;

    /// Returns the application name used to derive the base URL.
    fn application_name(&self) -> String;

    /// Returns a previously published base URL, if any.
    fn cached_base_url(&self) -> Option<String> {
        None
    }

    /// Rewrites the visible address without reloading the page.
    fn push_address(&self, url: &str);
}

/// An in-memory [`Host`] that records every pushed address.
///
/// # Example
///
/// ```
/// use oxide_nav::{Host, MemoryHost};
///
/// let host = MemoryHost::new("https://example.com/shop/users/1", "shop");
/// host.push_address("https://example.com/shop/users/2");
/// assert_eq!(host.current_url(), "https://example.com/shop/users/2");
/// assert_eq!(host.history().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    url: Mutex<String>,
    application: String,
    cached_base_url: Option<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryHost {
    /// Creates a host showing `url` for application `application`.
    #[must_use]
    pub fn new(url: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            url: Mutex::new(url.into()),
            application: application.into(),
            cached_base_url: None,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Sets the cached base URL.
    #[must_use]
    pub fn with_cached_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.cached_base_url = Some(base_url.into());
        self
    }

    /// Replaces the current URL, as if the user followed a link.
    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.lock() = url.into();
    }

    /// Returns every address pushed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Returns the most recently pushed address.
    #[must_use]
    pub fn last_address(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

impl Host for MemoryHost {
    fn current_url(&self) -> String {
        self.url.lock().clone()
    }

    fn application_name(&self) -> String {
        self.application.clone()
    }

    fn cached_base_url(&self) -> Option<String> {
        self.cached_base_url.clone()
    }

    fn push_address(&self, url: &str) {
        *self.url.lock() = url.to_string();
        self.history.lock().push(url.to_string());
    }
}
