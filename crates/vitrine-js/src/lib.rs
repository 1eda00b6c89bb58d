//! WASM bindings for the vitrine storefront runtime.
//!
//! Themes load this module once, construct a [`Storefront`], and call
//! `mount()`. From then on same-origin link clicks become client-side
//! page transitions, and the bundled widgets are rebuilt after every
//! swap. Theme scripts hook into the cycle with `onRerender`.

mod storefront;
mod types;

pub use storefront::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic messages and console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A theme may load the module more than once; only the first
    // subscriber wins.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
