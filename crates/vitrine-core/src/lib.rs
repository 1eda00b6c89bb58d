//! Platform-independent logic for storefront page transitions.
//!
//! Storefront themes navigate like single-page apps: same-origin clicks
//! are intercepted, the next page is fetched and parsed off-screen, the
//! content shell and page assets are swapped, and behavior is wired back
//! up. This crate holds everything about that cycle which does not touch
//! the DOM, so it can be tested natively:
//!
//! - [`intercept`]: turning a click snapshot into a routing decision
//! - [`assets`]: tracking page-scoped stylesheets and scripts
//! - [`lifecycle`]: the re-render hook registry
//! - [`navigation`]: request and completion ordering across overlapping
//!   navigations
//! - [`config`]: router tuning with stock-theme defaults
//! - [`placement`], [`viewport`], [`quantity`]: widget geometry and
//!   clamping rules
//!
//! The DOM half lives in `vitrine-browser`; the JS surface in
//! `vitrine-js`.

pub mod assets;
pub mod config;
pub mod error;
pub mod intercept;
pub mod lifecycle;
pub mod navigation;
pub mod placement;
pub mod quantity;
pub mod viewport;

pub use assets::{AssetKind, AssetPlan, GlobalAssetPolicy, PageAssetSet, PlannedAsset};
pub use config::RouterConfig;
pub use error::{HookError, NavError, WidgetError};
pub use intercept::{
    AnchorInfo, BypassReason, ButtonInfo, ClickContext, CurrentLocation, Decision, ResolvedHref,
    decide_anchor, decide_button, extract_onclick_href, resolve_href,
};
pub use lifecycle::{Hook, LifecycleRegistry};
pub use navigation::{LoadPhase, NavRequest, NavSequence, NavToken};
pub use placement::{PanelAlignment, PanelPlacement};
pub use quantity::QuantityBounds;

pub use smol_str::SmolStr;
