//! # oxide-nav
//!
//! Client-side navigation: route templates compiled into matchers, and a
//! router that fans navigations out to the listeners of every matching
//! template.
//!
//! This crate provides:
//! - Route templates with literals, wildcards and typed named segments
//! - Typed extraction of segment values
//! - A listener registry keyed by template
//! - Navigation that updates the host's visible address
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use oxide_nav::{MemoryHost, Router};
//!
//! let host = Arc::new(MemoryHost::new("https://example.com/shop/users/42", "shop"));
//! let router = Router::new(host.clone()).unwrap();
//!
//! router
//!     .on_route_match(&["users/:id:int", "users/:id:int/edit"], |event| {
//!         println!("user {:?}", event.value("id"));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Dispatch the URL the host is currently showing.
//! let navigation = router.navigate().unwrap().unwrap();
//! assert_eq!(navigation.matched, vec!["users/:id:int"]);
//! ```
//!
//! ## Templates
//!
//! Components are separated by `/`, `?` or `&`:
//!
//! - `users` matches the literal text, ignoring case
//! - `*` matches anything
//! - `:name` captures a string
//! - `:name:int`, `:name:num` and `:name:bool` capture typed values; a path
//!   whose component does not convert does not match
//!
//! ```
//! use oxide_nav::CompiledRoute;
//!
//! let route = CompiledRoute::compile("flag/:on:bool").unwrap();
//! assert_eq!(route.get_bool("flag/0", "on"), Some(false));
//! assert_eq!(route.get_bool("flag/yes", "on"), Some(true));
//! ```
//!
//! ## Listener Failures
//!
//! By default every listener runs even if an earlier one fails, and the
//! failures are returned together as [`RouterError::Listener`]. Set
//! [`ListenerFailurePolicy::Abort`] in [`RouterConfig`] to stop at the first
//! failure instead.

#![warn(clippy::must_use_candidate)]

mod config;
mod error;
mod event;
mod host;
mod route;
mod router;
mod segment;

pub use config::{ListenerFailurePolicy, RouterConfig};
pub use error::{BoxError, ListenerFailure, Result, RouterError};
pub use event::RouteMatchEvent;
pub use host::{Host, MemoryHost};
pub use route::{split_components, CompiledRoute};
pub use router::{Listener, ListenerResult, Navigation, Router};
pub use segment::{Segment, SegmentKind, SegmentValue};
