//! Click interception rules.
//!
//! The browser layer snapshots a click into plain data and asks this module
//! what to do with it. Keeping the rules pure keeps them testable without a
//! DOM, and keeps the event handler itself down to a dispatch.
//!
//! Rule order for anchors:
//!
//! 1. modified or non-primary clicks are left to the browser
//! 2. so are anchors without a usable href, `mailto:`/`tel:` links, links
//!    opening a new tab, and downloads
//! 3. `#fragment` hrefs become in-page scrolls
//! 4. cross-origin targets are left to the browser
//! 5. targets resolving to the current path and query are left alone
//! 6. everything else becomes a client-side navigation
//!
//! Buttons carrying a literal `window.location.href = '...'` assignment in
//! their `onclick` attribute get the same origin and same-route checks.

use std::sync::LazyLock;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
use regex_lite::Regex;

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use regex::Regex;

use smol_str::SmolStr;
use url::Url;

/// Captures the target of a literal location assignment, e.g.
/// `window.location.href = '/cart'`.
static LOCATION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.location\.href\s*=\s*['"]([^'"]+)['"]"#).unwrap()
});

/// Modifier and button state of a click, snapshotted off the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickContext {
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickContext {
    /// A plain primary-button click.
    pub fn primary() -> Self {
        ClickContext::default()
    }

    /// Whether the click asks for browser-level behavior such as opening a
    /// new tab. Any modifier key or non-primary button counts.
    pub fn is_modified(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt || self.button != 0
    }
}

/// The attributes of a clicked anchor that matter for routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorInfo {
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
}

impl AnchorInfo {
    pub fn with_href(href: impl Into<String>) -> Self {
        AnchorInfo {
            href: Some(href.into()),
            ..AnchorInfo::default()
        }
    }
}

/// The attributes of a clicked button that matter for routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonInfo {
    pub onclick: Option<String>,
}

/// The document URL a click is being judged against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLocation {
    url: Url,
}

impl CurrentLocation {
    /// Parses a full href such as `window.location.href`. Returns `None`
    /// for anything that is not an absolute URL.
    pub fn parse(href: &str) -> Option<Self> {
        let url = Url::parse(href).ok()?;
        Some(CurrentLocation { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path plus query of the current document, fragment excluded.
    pub fn path_and_query(&self) -> String {
        path_and_query(&self.url)
    }
}

/// Path plus query string of a URL, fragment excluded.
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Outcome of resolving an href against the current document URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedHref {
    /// Same-origin target, reduced to its path and query.
    SameOrigin { path_and_query: String },
    /// Different origin, including opaque schemes like `javascript:`.
    CrossOrigin,
    /// The href does not resolve to a URL at all.
    Malformed,
}

/// Resolves `href` (absolute or relative) against the current location.
pub fn resolve_href(current: &CurrentLocation, href: &str) -> ResolvedHref {
    let Ok(resolved) = current.url.join(href) else {
        return ResolvedHref::Malformed;
    };
    if resolved.origin() != current.url.origin() {
        return ResolvedHref::CrossOrigin;
    }
    ResolvedHref::SameOrigin {
        path_and_query: path_and_query(&resolved),
    }
}

/// Why a click was handed back to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    /// Modifier key held or non-primary button.
    ModifiedClick,
    /// No href, or an empty one.
    NoHref,
    /// `mailto:` or `tel:` scheme.
    ExternalScheme,
    /// `target="_blank"` or a download attribute.
    OpensNewContext,
    /// Resolves outside the current origin.
    CrossOrigin,
    /// Resolves to the page already being shown.
    SameRoute,
    /// The href does not parse as a URL.
    Malformed,
    /// Button without a recognizable location assignment.
    NoNavigation,
}

/// What to do with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Do not touch the event.
    Bypass(BypassReason),
    /// Scroll to the element with this id, if it exists.
    ScrollTo(SmolStr),
    /// Run a client-side navigation to this path and query.
    Navigate(String),
}

/// Decides what to do with a click on an anchor.
pub fn decide_anchor(
    click: &ClickContext,
    anchor: &AnchorInfo,
    current: &CurrentLocation,
) -> Decision {
    if click.is_modified() {
        return Decision::Bypass(BypassReason::ModifiedClick);
    }
    let href = match anchor.href.as_deref() {
        None | Some("") => return Decision::Bypass(BypassReason::NoHref),
        Some(href) => href,
    };
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return Decision::Bypass(BypassReason::ExternalScheme);
    }
    if anchor.target.as_deref() == Some("_blank") || anchor.download {
        return Decision::Bypass(BypassReason::OpensNewContext);
    }
    if let Some(fragment) = href.strip_prefix('#') {
        return Decision::ScrollTo(SmolStr::new(fragment));
    }
    decide_resolved(href, current)
}

/// Decides what to do with a click on a button. Only buttons whose onclick
/// is a literal location assignment navigate; anything scripted beyond
/// that keeps its own behavior.
pub fn decide_button(
    click: &ClickContext,
    button: &ButtonInfo,
    current: &CurrentLocation,
) -> Decision {
    if click.is_modified() {
        return Decision::Bypass(BypassReason::ModifiedClick);
    }
    let Some(href) = button.onclick.as_deref().and_then(extract_onclick_href) else {
        return Decision::Bypass(BypassReason::NoNavigation);
    };
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return Decision::Bypass(BypassReason::ExternalScheme);
    }
    if let Some(fragment) = href.strip_prefix('#') {
        return Decision::ScrollTo(SmolStr::new(fragment));
    }
    decide_resolved(href, current)
}

fn decide_resolved(href: &str, current: &CurrentLocation) -> Decision {
    match resolve_href(current, href) {
        ResolvedHref::Malformed => Decision::Bypass(BypassReason::Malformed),
        ResolvedHref::CrossOrigin => Decision::Bypass(BypassReason::CrossOrigin),
        ResolvedHref::SameOrigin { path_and_query } => {
            if path_and_query == current.path_and_query() {
                Decision::Bypass(BypassReason::SameRoute)
            } else {
                Decision::Navigate(path_and_query)
            }
        }
    }
}

/// Pulls the target out of a literal `window.location.href = '...'`
/// assignment.
pub fn extract_onclick_href(onclick: &str) -> Option<&str> {
    LOCATION_ASSIGNMENT
        .captures(onclick)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
