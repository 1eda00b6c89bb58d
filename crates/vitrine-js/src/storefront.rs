//! Storefront - the page-transition runtime exposed to JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use vitrine_browser::dom::js_error_string;
use vitrine_browser::widgets::WidgetSet;
use vitrine_browser::{Router, history, invoke_registry};
use vitrine_core::{HookError, LifecycleRegistry, RouterConfig};

use crate::types::StorefrontConfig;

/// The storefront runtime: the transition router plus the widget set it
/// rebuilds after every swap.
///
/// Construct once per page load, register any theme hooks, then call
/// `mount()`.
#[wasm_bindgen]
pub struct Storefront {
    router: Router,
    registry: Rc<RefCell<LifecycleRegistry>>,
    widgets: Rc<RefCell<WidgetSet>>,
    mounted: bool,
}

#[wasm_bindgen]
impl Storefront {
    /// Creates the runtime without touching the page. Pass a config to
    /// override the stock selectors and asset allowlist.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<StorefrontConfig>) -> Storefront {
        let config: RouterConfig = config.unwrap_or_default().into();
        let registry = Rc::new(RefCell::new(LifecycleRegistry::new()));
        let widgets = Rc::new(RefCell::new(WidgetSet::new()));

        // Widgets are the first hook, so theme hooks registered later
        // always see the rebuilt widget set.
        registry
            .borrow_mut()
            .register("widgets", WidgetSet::lifecycle_hook(Rc::clone(&widgets)));

        let router = Router::new(config, Rc::clone(&registry));
        Storefront {
            router,
            registry,
            widgets,
            mounted: false,
        }
    }

    // === Lifecycle ===

    /// Wires the router into the live page and runs every hook once.
    ///
    /// Hooks registered before this call persist across navigations;
    /// hooks registered after it belong to the current page and are
    /// dropped when the next one loads. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Result<(), JsError> {
        if self.mounted {
            return Ok(());
        }
        let window =
            web_sys::window().ok_or_else(|| JsError::new("no window to mount into"))?;
        history::set_manual_scroll_restoration(&window);
        history::scroll_to_top(&window);

        self.registry.borrow_mut().seal_baseline();
        let installed = self
            .router
            .install()
            .map_err(|error| JsError::new(&js_error_string(&error)))?;
        if !installed {
            tracing::warn!(
                target: "vitrine::router",
                "transitions disabled; widgets still running"
            );
        }
        invoke_registry(&self.registry);
        self.mounted = true;
        Ok(())
    }

    /// Detaches the router and every widget, and drops page-scoped
    /// hooks.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.router.uninstall();
        self.widgets.borrow_mut().detach_all();
        self.registry.borrow_mut().reset_to_baseline();
        self.mounted = false;
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // === Navigation ===

    /// Navigates through the transition pipeline, pushing a history
    /// entry. Anything that does not resolve to a same-origin URL falls
    /// back to a full page load.
    pub fn navigate(&self, url: &str) {
        self.router.navigate(url, false);
    }

    /// Like `navigate`, but replaces the current history entry.
    #[wasm_bindgen(js_name = navigateReplace)]
    pub fn navigate_replace(&self, url: &str) {
        self.router.navigate(url, true);
    }

    /// Path and query of the current document.
    #[wasm_bindgen(js_name = currentPath)]
    pub fn current_path(&self) -> Option<String> {
        let window = web_sys::window()?;
        history::current_path_and_query(&window)
    }

    // === Re-render hooks ===

    /// Registers a callback to run after every page swap. Registering an
    /// id that already exists replaces that callback in place, keeping
    /// its position in the run order.
    #[wasm_bindgen(js_name = onRerender)]
    pub fn on_rerender(&self, id: &str, callback: js_sys::Function) -> Result<(), JsError> {
        let hook = Box::new(move || {
            callback
                .call0(&JsValue::NULL)
                .map(|_| ())
                .map_err(|error| HookError::from(js_error_string(&error)))
        });
        self.registry
            .try_borrow_mut()
            .map_err(|_| JsError::new("cannot register hooks during a re-render pass"))?
            .register(id, hook);
        Ok(())
    }

    /// Removes a re-render callback. Returns whether it existed.
    #[wasm_bindgen(js_name = offRerender)]
    pub fn off_rerender(&self, id: &str) -> Result<bool, JsError> {
        Ok(self
            .registry
            .try_borrow_mut()
            .map_err(|_| JsError::new("cannot unregister hooks during a re-render pass"))?
            .unregister(id))
    }

    /// Runs every registered hook now, widgets first. Returns the number
    /// of hooks that failed.
    pub fn rerender(&self) -> usize {
        invoke_registry(&self.registry)
    }

    // === Introspection ===

    /// The effective configuration after defaults were applied.
    pub fn config(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.router.config())
            .map_err(|error| JsError::new(&format!("serialization error: {error}")))
    }

    /// The runtime's crate version.
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
