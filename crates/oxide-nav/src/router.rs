//! Route registry, navigation and listener dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ListenerFailurePolicy, RouterConfig};
use crate::error::{BoxError, ListenerFailure, Result, RouterError};
use crate::event::RouteMatchEvent;
use crate::host::Host;
use crate::route::CompiledRoute;

/// Value returned by a route listener.
pub type ListenerResult = std::result::Result<(), BoxError>;

/// A shared route listener.
pub type Listener = Arc<dyn Fn(&RouteMatchEvent<'_>) -> ListenerResult + Send + Sync>;

/// Characters escaped when composing the pushed address.
const ADDRESS: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'\\')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// A registered template and its listeners.
struct RouteEntry {
    route: Arc<CompiledRoute>,
    listeners: Vec<Listener>,
}

/// Templates in first-registration order, indexed by template string.
#[derive(Default)]
struct Registry {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    fn entry(&mut self, route: Arc<CompiledRoute>) -> &mut RouteEntry {
        let len = self.entries.len();
        let slot = *self
            .index
            .entry(route.template().to_string())
            .or_insert(len);
        if slot == len {
            self.entries.push(RouteEntry {
                route,
                listeners: Vec::new(),
            });
        }
        &mut self.entries[slot]
    }

    fn get(&self, template: &str) -> Option<&RouteEntry> {
        self.index.get(template).map(|&i| &self.entries[i])
    }

    fn snapshot(&self) -> Vec<(Arc<CompiledRoute>, Vec<Listener>)> {
        self.entries
            .iter()
            .map(|e| (Arc::clone(&e.route), e.listeners.clone()))
            .collect()
    }
}

/// Outcome of a single navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The path navigated to.
    pub path: String,
    /// Templates that matched, in dispatch order.
    pub matched: Vec<String>,
    /// Number of listener invocations.
    pub invoked: usize,
    /// Address pushed to the host, if any template matched.
    pub address: Option<String>,
}

impl Navigation {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Returns whether any template matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Dispatches navigations to the listeners of matching route templates.
///
/// Construct one router when the application starts and share it (for
/// example behind an `Arc`) with every component that registers routes or
/// navigates.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use oxide_nav::{MemoryHost, Router};
///
/// let host = Arc::new(MemoryHost::new("https://example.com/shop/", "shop"));
/// let router = Router::new(host.clone()).unwrap();
///
/// router
///     .on_route_match(&["users/:id:int"], |event| {
///         assert_eq!(event.route().get_int(event.path(), "id"), Some(42));
///         Ok(())
///     })
///     .unwrap();
///
/// let navigation = router.navigate_to("users/42").unwrap();
/// assert!(navigation.is_match());
/// assert_eq!(router.current_route(), "users/42");
/// assert_eq!(
///     host.last_address().as_deref(),
///     Some("https://example.com/shop/users/42")
/// );
/// ```
pub struct Router {
    host: Arc<dyn Host>,
    base_url: String,
    listener_failure: ListenerFailurePolicy,
    registry: RwLock<Registry>,
    current_route: RwLock<String>,
}

impl Router {
    /// Creates a router with default configuration.
    pub fn new(host: Arc<dyn Host>) -> Result<Self> {
        Self::with_config(host, RouterConfig::default())
    }

    /// Creates a router.
    ///
    /// The base URL is taken from `config`, then from the host's cached base
    /// URL, and is otherwise derived from the host URL up to and including
    /// the application name.
    pub fn with_config(host: Arc<dyn Host>, config: RouterConfig) -> Result<Self> {
        let base_url = resolve_base_url(host.as_ref(), config.base_url)?;
        debug!(base_url = %base_url, "router created");

        Ok(Self {
            host,
            base_url,
            listener_failure: config.listener_failure,
            registry: RwLock::new(Registry::default()),
            current_route: RwLock::new(String::new()),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the path of the last successful navigation.
    #[must_use]
    pub fn current_route(&self) -> String {
        self.current_route.read().clone()
    }

    /// Registers `listener` for each template.
    ///
    /// Listeners of one template are dispatched in registration order.
    /// Nothing is registered if any template fails to compile.
    pub fn on_route_match<F>(&self, templates: &[&str], listener: F) -> Result<()>
    where
        F: Fn(&RouteMatchEvent<'_>) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(templates, Arc::new(listener))
    }

    /// Registers a shared listener for each template.
    pub fn add_listener(&self, templates: &[&str], listener: Listener) -> Result<()> {
        let mut pending = Vec::with_capacity(templates.len());
        {
            let registry = self.registry.read();
            for template in templates {
                let route = match registry.get(template) {
                    Some(entry) => Arc::clone(&entry.route),
                    None => Arc::new(CompiledRoute::compile(template)?),
                };
                pending.push(route);
            }
        }

        let mut registry = self.registry.write();
        for route in pending {
            registry.entry(route).listeners.push(Arc::clone(&listener));
        }
        info!(
            templates = templates.len(),
            routes = registry.entries.len(),
            "registered route listener"
        );
        Ok(())
    }

    /// Returns the registered templates in dispatch order.
    #[must_use]
    pub fn templates(&self) -> Vec<String> {
        self.registry
            .read()
            .entries
            .iter()
            .map(|e| e.route.template().to_string())
            .collect()
    }

    /// Returns the number of listeners registered for `template`.
    #[must_use]
    pub fn listener_count(&self, template: &str) -> usize {
        self.registry
            .read()
            .get(template)
            .map_or(0, |e| e.listeners.len())
    }

    /// Navigates to the host's current URL.
    ///
    /// The part after the base URL is percent-decoded, so an address pushed
    /// by [`navigate_to`](Self::navigate_to) dispatches the same path again.
    /// Returns `None` without dispatching when the URL does not start with
    /// the base URL followed by `/`.
    pub fn navigate(&self) -> Result<Option<Navigation>> {
        let url = self.host.current_url();
        let prefix = format!("{}/", self.base_url);
        match url.strip_prefix(&prefix) {
            Some(path) => {
                let path = percent_decode_str(path).decode_utf8_lossy();
                self.navigate_to(&path).map(Some)
            }
            None => {
                debug!(url = %url, base_url = %self.base_url, "URL outside base URL, ignored");
                Ok(None)
            }
        }
    }

    /// Navigates to `path`.
    ///
    /// Every matching template's listeners receive a [`RouteMatchEvent`].
    /// The first match sets the current route, and the address is pushed to
    /// the host once after dispatch. A path that matches nothing changes
    /// nothing.
    pub fn navigate_to(&self, path: &str) -> Result<Navigation> {
        let snapshot = self.registry.read().snapshot();
        let mut navigation = Navigation::new(path);
        let mut failures = Vec::new();

        for (route, listeners) in snapshot {
            if !route.matches(path) {
                continue;
            }
            debug!(template = route.template(), path, "route matched");

            if !navigation.is_match() {
                *self.current_route.write() = path.to_string();
            }
            navigation.matched.push(route.template().to_string());

            let event = RouteMatchEvent::new(self, Arc::clone(&route), path);
            for (index, listener) in listeners.iter().enumerate() {
                navigation.invoked += 1;
                let Err(error) = listener(&event) else {
                    continue;
                };
                warn!(template = route.template(), index, %error, "route listener failed");
                let failure = ListenerFailure {
                    template: route.template().to_string(),
                    index,
                    error,
                };
                if self.listener_failure == ListenerFailurePolicy::Abort {
                    return Err(RouterError::Listener {
                        path: path.to_string(),
                        failures: vec![failure],
                    });
                }
                failures.push(failure);
            }
        }

        if navigation.is_match() {
            let address = self.address_for(path);
            self.host.push_address(&address);
            info!(
                path,
                matched = navigation.matched.len(),
                invoked = navigation.invoked,
                "navigated"
            );
            navigation.address = Some(address);
        }

        if failures.is_empty() {
            Ok(navigation)
        } else {
            Err(RouterError::Listener {
                path: path.to_string(),
                failures,
            })
        }
    }

    /// Removes every listener, keeping the registered templates.
    pub fn clear_all_listeners(&self) {
        let mut registry = self.registry.write();
        for entry in &mut registry.entries {
            entry.listeners.clear();
        }
    }

    /// Composes the address pushed to the host for `route`.
    #[must_use]
    pub fn address_for(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(route, ADDRESS)
        )
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("base_url", &self.base_url)
            .field("current_route", &*self.current_route.read())
            .field("templates", &self.templates())
            .finish_non_exhaustive()
    }
}

fn resolve_base_url(host: &dyn Host, configured: Option<String>) -> Result<String> {
    if let Some(base_url) = configured.or_else(|| host.cached_base_url()) {
        return Ok(base_url);
    }

    let url = host.current_url();
    let application = host.application_name();
    match url.find(&application) {
        Some(start) if !application.is_empty() => {
            Ok(url[..start + application.len()].to_string())
        }
        _ => Err(RouterError::BaseUrl { url, application }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use parking_lot::Mutex;

    fn router(url: &str) -> (Arc<MemoryHost>, Router) {
        let host = Arc::new(MemoryHost::new(url, "app"));
        let router = Router::new(host.clone()).unwrap();
        (host, router)
    }

    #[test]
    fn test_base_url_derivation() {
        let (_, router) = router("http://localhost:8080/app/users/1");
        assert_eq!(router.base_url(), "http://localhost:8080/app");
    }

    #[test]
    fn test_base_url_precedence() {
        let host = Arc::new(
            MemoryHost::new("http://localhost/app/x", "app").with_cached_base_url("http://cached"),
        );
        let router = Router::new(host.clone()).unwrap();
        assert_eq!(router.base_url(), "http://cached");

        let config = RouterConfig::new().base_url("http://configured");
        let router = Router::with_config(host, config).unwrap();
        assert_eq!(router.base_url(), "http://configured");
    }

    #[test]
    fn test_base_url_missing_application() {
        let host = Arc::new(MemoryHost::new("http://localhost/other", "app"));
        let err = Router::new(host).unwrap_err();
        assert!(matches!(err, RouterError::BaseUrl { .. }));
    }

    #[test]
    fn test_same_template_accumulates() {
        let (_, router) = router("http://localhost/app");
        router.on_route_match(&["a/:x"], |_| Ok(())).unwrap();
        router.on_route_match(&["a/:x", "b"], |_| Ok(())).unwrap();
        assert_eq!(router.templates(), vec!["a/:x", "b"]);
        assert_eq!(router.listener_count("a/:x"), 2);
        assert_eq!(router.listener_count("b"), 1);
        assert_eq!(router.listener_count("c"), 0);
    }

    #[test]
    fn test_invalid_template_registers_nothing() {
        let (_, router) = router("http://localhost/app");
        let err = router.on_route_match(&["ok", "bad/:"], |_| Ok(()));
        assert!(matches!(err, Err(RouterError::InvalidTemplate { .. })));
        assert!(router.templates().is_empty());
    }

    #[test]
    fn test_no_match_leaves_state() {
        let (host, router) = router("http://localhost/app");
        router.on_route_match(&["users/:id:int"], |_| Ok(())).unwrap();
        let navigation = router.navigate_to("posts/1").unwrap();
        assert!(!navigation.is_match());
        assert_eq!(navigation.address, None);
        assert_eq!(router.current_route(), "");
        assert!(host.history().is_empty());
    }

    #[test]
    fn test_navigate_from_host_url() {
        let (host, router) = router("http://localhost/app/users/7");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        router
            .on_route_match(&["users/:id:int"], move |event| {
                sink.lock().push(event.route().get_int(event.path(), "id"));
                Ok(())
            })
            .unwrap();

        let navigation = router.navigate().unwrap().unwrap();
        assert_eq!(navigation.path, "users/7");
        assert_eq!(*seen.lock(), vec![Some(7)]);

        host.set_url("http://elsewhere/users/8");
        assert!(router.navigate().unwrap().is_none());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_address_is_escaped() {
        let (_, router) = router("http://localhost/app");
        assert_eq!(
            router.address_for("search?q=a b&x='1'"),
            "http://localhost/app/search?q=a%20b&x=%271%27"
        );
        assert_eq!(
            router.address_for("off/50%"),
            "http://localhost/app/off/50%25"
        );
    }

    #[test]
    fn test_listener_sees_current_route() {
        let (_, router) = router("http://localhost/app");
        router
            .on_route_match(&["*"], |event| {
                assert_eq!(event.router().current_route(), event.path());
                Ok(())
            })
            .unwrap();
        router.navigate_to("anything").unwrap();
    }
}
