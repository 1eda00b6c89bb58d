//! Error types shared across the navigation and widget layers.

use thiserror::Error;

/// Failures that can occur during a client-side navigation cycle.
///
/// Fetch and parse failures abort the cycle and hand the URL back to the
/// browser for a full navigation. Asset failures are reported per-URL and
/// do not abort the cycle.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NavError {
    /// The server answered with a non-success status code.
    #[error("request for {url} returned status {status}")]
    Http { url: String, status: u16 },

    /// The fetch itself failed before a response arrived.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The response body could not be parsed into a document.
    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    /// A stylesheet or script belonging to the new page failed to load.
    #[error("asset {url} failed to load: {message}")]
    AssetLoad { url: String, message: String },

    /// Neither a shell container nor a document body was available to
    /// swap content into.
    #[error("no element matching {selector:?} and no body to replace")]
    MissingShell { selector: String },

    /// A DOM operation failed mid-cycle.
    #[error("dom operation failed: {0}")]
    Dom(String),
}

/// Error raised by a re-render hook.
///
/// Hook failures are isolated: a failing hook is logged and skipped while
/// the remaining hooks still run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

impl From<String> for HookError {
    fn from(value: String) -> Self {
        HookError(value)
    }
}

impl From<&str> for HookError {
    fn from(value: &str) -> Self {
        HookError(value.to_string())
    }
}

/// Failures while wiring a widget to its DOM subtree.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WidgetError {
    /// A required element was not found under the widget root.
    #[error("{widget}: missing element {selector:?}")]
    MissingElement {
        widget: &'static str,
        selector: String,
    },

    /// A DOM call failed while attaching.
    #[error("{widget}: {message}")]
    Dom {
        widget: &'static str,
        message: String,
    },
}
