//! Error types for route compilation and navigation.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by a failing route listener.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A `:name[:type]` token in a template is malformed.
    #[error("invalid route template `{template}`: token `{token}` {reason}")]
    InvalidTemplate {
        template: String,
        token: String,
        reason: &'static str,
    },

    /// The matcher built from a template was rejected by the regex engine.
    #[error("invalid route template `{template}`: {source}")]
    Pattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// A template declares the same segment name more than once.
    #[error("invalid route template `{template}`: segment `{name}` is declared twice")]
    DuplicateSegment { template: String, name: String },

    /// The base URL could not be derived from the host URL.
    #[error("cannot derive base URL: application `{application}` does not occur in `{url}`")]
    BaseUrl { url: String, application: String },

    /// One or more listeners failed while dispatching a navigation.
    #[error("{} listener(s) failed while navigating to `{path}`", failures.len())]
    Listener {
        path: String,
        failures: Vec<ListenerFailure>,
    },

    /// The router configuration could not be parsed.
    #[error("invalid router configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// A single listener failure recorded during dispatch.
#[derive(Debug)]
pub struct ListenerFailure {
    /// Template whose listener failed.
    pub template: String,
    /// Position of the listener in that template's listener list.
    pub index: usize,
    /// The error the listener returned.
    pub error: BoxError,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listener #{} of `{}`: {}",
            self.index, self.template, self.error
        )
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
