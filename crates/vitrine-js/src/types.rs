//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use vitrine_core::RouterConfig;

/// Options accepted by the [`Storefront`](crate::Storefront) constructor.
///
/// Every field is optional; anything omitted falls back to the stock
/// theme defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Selector for the element swapped between pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell_selector: Option<String>,
    /// Substrings identifying theme-level assets that survive
    /// transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_assets: Option<Vec<String>>,
    /// Name of the header attached to shell fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_header_name: Option<String>,
    /// Value of the header attached to shell fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_header_value: Option<String>,
    /// Animate in-page hash scrolling instead of jumping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth_scroll: Option<bool>,
}

impl From<StorefrontConfig> for RouterConfig {
    fn from(config: StorefrontConfig) -> Self {
        let defaults = RouterConfig::default();
        RouterConfig {
            shell_selector: config.shell_selector.unwrap_or(defaults.shell_selector),
            global_assets: config.global_assets.unwrap_or(defaults.global_assets),
            fetch_header_name: config
                .fetch_header_name
                .unwrap_or(defaults.fetch_header_name),
            fetch_header_value: config
                .fetch_header_value
                .unwrap_or(defaults.fetch_header_value),
            smooth_scroll: config.smooth_scroll.unwrap_or(defaults.smooth_scroll),
        }
    }
}
