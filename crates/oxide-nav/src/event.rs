//! The event delivered to route listeners.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::route::CompiledRoute;
use crate::router::Router;
use crate::segment::SegmentValue;

/// Tells a listener that one of its templates matched a navigation.
#[derive(Clone)]
pub struct RouteMatchEvent<'a> {
    router: &'a Router,
    route: Arc<CompiledRoute>,
    path: &'a str,
}

impl<'a> RouteMatchEvent<'a> {
    pub(crate) fn new(router: &'a Router, route: Arc<CompiledRoute>, path: &'a str) -> Self {
        Self {
            router,
            route,
            path,
        }
    }

    /// Returns the router that dispatched this event.
    #[must_use]
    pub fn router(&self) -> &'a Router {
        self.router
    }

    /// Returns the route that matched.
    #[must_use]
    pub fn route(&self) -> &CompiledRoute {
        &self.route
    }

    /// Returns the template that matched.
    #[must_use]
    pub fn template(&self) -> &str {
        self.route.template()
    }

    /// Returns the path being navigated to.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Extracts segment `name` from the navigated path.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<SegmentValue> {
        self.route.value(self.path, name)
    }

    /// Extracts every named segment from the navigated path.
    #[must_use]
    pub fn values(&self) -> HashMap<String, SegmentValue> {
        self.route.values(self.path).unwrap_or_default()
    }
}

impl fmt::Debug for RouteMatchEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatchEvent")
            .field("route", &self.route.template())
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for RouteMatchEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.path, self.route.template())
    }
}
