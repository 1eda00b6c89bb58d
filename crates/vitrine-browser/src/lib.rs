//! Browser DOM layer for storefront page transitions.
//!
//! Pairs the pure logic in `vitrine-core` with web-sys:
//!
//! - [`router`]: click interception, fetch-and-swap cycles, history
//! - [`page`]: fetching, parsing, and applying page documents
//! - [`assets`]: the live-document asset tracker
//! - [`history`]: History API and scroll coordination
//! - [`widgets`]: theme widgets rebuilt after every transition
//! - [`dom`]: event snapshots and small DOM helpers
//!
//! Everything here assumes a browser main thread; nothing is `Send`.

pub mod assets;
pub mod dom;
pub mod history;
pub mod page;
pub mod router;
pub mod widgets;

pub use assets::{AssetLoad, AssetTracker};
pub use page::SwapMode;
pub use router::{Router, invoke_registry};
pub use widgets::{
    DropdownNav, QuantityStepper, SearchOverlay, SectionReveal, SidePanelGroup, Widget, WidgetSet,
};

// Re-export the platform-independent layer so downstream crates only need
// one dependency.
pub use vitrine_core;
pub use vitrine_core::*;
