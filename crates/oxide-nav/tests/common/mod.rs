#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use oxide_nav::{MemoryHost, RouteMatchEvent, Router, RouterConfig};

pub const BASE_URL: &str = "https://example.com/app";

/// Records `(tag, template, path)` for every listener invocation.
pub type Calls = Arc<Mutex<Vec<(String, String, String)>>>;

pub fn host() -> Arc<MemoryHost> {
    Arc::new(MemoryHost::new(format!("{BASE_URL}/"), "app"))
}

pub fn router() -> (Arc<MemoryHost>, Router) {
    router_with(RouterConfig::default())
}

pub fn router_with(config: RouterConfig) -> (Arc<MemoryHost>, Router) {
    let host = host();
    let router = Router::with_config(host.clone(), config)
        .unwrap_or_else(|e| panic!("Failed to create router: {e}"));
    (host, router)
}

pub fn calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

/// Returns a listener that appends to `calls` under `tag`.
pub fn recorder(
    calls: &Calls,
    tag: &str,
) -> impl Fn(&RouteMatchEvent<'_>) -> oxide_nav::ListenerResult + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    let tag = tag.to_string();
    move |event: &RouteMatchEvent<'_>| {
        calls.lock().push((
            tag.clone(),
            event.template().to_string(),
            event.path().to_string(),
        ));
        Ok(())
    }
}

pub fn tags(calls: &Calls) -> Vec<String> {
    calls.lock().iter().map(|(tag, _, _)| tag.clone()).collect()
}
