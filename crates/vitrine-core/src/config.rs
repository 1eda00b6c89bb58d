//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::assets::GlobalAssetPolicy;

/// Default CSS selector for the content shell that gets swapped between
/// pages.
pub const DEFAULT_SHELL_SELECTOR: &str = ".vitrine-shell";

/// Substrings identifying theme-level assets that are loaded once and must
/// survive page transitions.
pub const DEFAULT_GLOBAL_ASSETS: [&str; 9] = [
    "vitrine-preloader.css",
    "vitrine-preloader.js",
    "vitrine-shell.css",
    "vitrine-widgets.css",
    "vitrine-theme.css",
    "vendors.js",
    "vitrine-shell.js",
    "vitrine-widgets.js",
    "vitrine-theme.js",
];

/// Header sent with every shell fetch so the server can distinguish
/// client-side transitions from full page loads.
pub const DEFAULT_FETCH_HEADER_NAME: &str = "X-Requested-With";
pub const DEFAULT_FETCH_HEADER_VALUE: &str = "fetch";

/// Tunable knobs for the page-transition router.
///
/// Every field has a default matching the stock theme markup, so themes
/// with conventional class names need no configuration at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Selector for the element whose inner HTML is replaced on
    /// navigation. When the fetched page has no match, the whole body is
    /// replaced instead.
    pub shell_selector: String,
    /// Substring allowlist of assets that are never swapped out.
    pub global_assets: Vec<String>,
    /// Name of the header attached to shell fetches.
    pub fetch_header_name: String,
    /// Value of the header attached to shell fetches.
    pub fetch_header_value: String,
    /// Animate in-page hash scrolling instead of jumping.
    pub smooth_scroll: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            shell_selector: DEFAULT_SHELL_SELECTOR.to_string(),
            global_assets: DEFAULT_GLOBAL_ASSETS.iter().map(|s| s.to_string()).collect(),
            fetch_header_name: DEFAULT_FETCH_HEADER_NAME.to_string(),
            fetch_header_value: DEFAULT_FETCH_HEADER_VALUE.to_string(),
            smooth_scroll: true,
        }
    }
}

impl RouterConfig {
    /// Builds the asset policy used to split page assets from theme-level
    /// ones.
    pub fn global_asset_policy(&self) -> GlobalAssetPolicy {
        GlobalAssetPolicy::new(self.global_assets.iter().cloned())
    }
}
