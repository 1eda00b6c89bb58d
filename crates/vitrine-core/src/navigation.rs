//! Navigation requests and completion ordering.
//!
//! Navigations overlap: a second click can land while the first page is
//! still fetching. Each cycle takes a token from a monotonic sequence, and
//! a cycle only applies its result while its token is still the newest.
//! Anything older completes into the void.

/// Input to one navigation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    /// Same-origin path plus query string, e.g. `/collections/all?page=2`.
    pub url: String,
    /// Replace the current history entry instead of pushing a new one.
    /// Used for popstate-driven loads.
    pub replace: bool,
}

impl NavRequest {
    pub fn push(url: impl Into<String>) -> Self {
        NavRequest {
            url: url.into(),
            replace: false,
        }
    }

    pub fn replace(url: impl Into<String>) -> Self {
        NavRequest {
            url: url.into(),
            replace: true,
        }
    }
}

/// Ticket for one navigation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavToken(u64);

impl NavToken {
    /// Whether a newer navigation has started since this one.
    pub fn is_stale(self, latest: NavToken) -> bool {
        self < latest
    }
}

/// Monotonic issuer of [`NavToken`]s. The most recently issued token is
/// the only one whose cycle may touch the document.
#[derive(Debug, Default)]
pub struct NavSequence {
    current: u64,
}

impl NavSequence {
    pub fn new() -> Self {
        NavSequence::default()
    }

    /// Starts a new navigation, invalidating all earlier tokens.
    pub fn begin(&mut self) -> NavToken {
        self.current += 1;
        NavToken(self.current)
    }

    pub fn latest(&self) -> NavToken {
        NavToken(self.current)
    }
}

/// Where a navigation cycle currently is. Used for tracing and to keep the
/// steps honest about their ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Fetching,
    Parsing,
    Swapping,
    Reinitializing,
}

impl LoadPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Fetching => "fetching",
            LoadPhase::Parsing => "parsing",
            LoadPhase::Swapping => "swapping",
            LoadPhase::Reinitializing => "reinitializing",
        }
    }
}
