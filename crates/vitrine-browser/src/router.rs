//! The page-transition router.
//!
//! One capture-phase click listener on the document feeds snapshots to the
//! pure decision layer; qualifying clicks turn into fetch-and-swap cycles.
//! Cycles overlap freely: each takes a token, and only the cycle holding
//! the newest token is allowed to touch the document when its awaits
//! resolve. Fetch or parse failures hand the URL to the browser for a
//! full navigation, so a broken transition degrades instead of stranding
//! the visitor.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::future::join_all;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, MouseEvent};

use vitrine_core::{
    AssetPlan, Decision, LifecycleRegistry, LoadPhase, NavError, NavRequest, NavSequence,
    NavToken, ResolvedHref, RouterConfig, decide_anchor, decide_button, resolve_href,
};

use crate::assets::AssetTracker;
use crate::dom::{self, js_error_string};
use crate::history;
use crate::page::{self, SwapMode};

enum CycleOutcome {
    /// The document now shows the requested page.
    Applied,
    /// A newer navigation started mid-cycle; this one changed nothing
    /// past its own asset loads.
    Superseded,
}

/// Installs the transition behavior on the current document and drives
/// navigation cycles.
pub struct Router {
    inner: Rc<RouterInner>,
}

struct RouterInner {
    config: RouterConfig,
    tracker: RefCell<AssetTracker>,
    registry: Rc<RefCell<LifecycleRegistry>>,
    sequence: RefCell<NavSequence>,
    phase: Cell<LoadPhase>,
    click_listener: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    popstate_listener: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    installed: Cell<bool>,
}

impl Router {
    pub fn new(config: RouterConfig, registry: Rc<RefCell<LifecycleRegistry>>) -> Self {
        let tracker = AssetTracker::new(config.global_asset_policy());
        Router {
            inner: Rc::new(RouterInner {
                config,
                tracker: RefCell::new(tracker),
                registry,
                sequence: RefCell::new(NavSequence::new()),
                phase: Cell::new(LoadPhase::Idle),
                click_listener: RefCell::new(None),
                popstate_listener: RefCell::new(None),
                installed: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    pub fn is_installed(&self) -> bool {
        self.inner.installed.get()
    }

    /// Current phase of the most recent navigation cycle.
    pub fn phase(&self) -> LoadPhase {
        self.inner.phase.get()
    }

    /// Attaches the click and popstate listeners. Returns `false` without
    /// installing anything when the document has no shell element, in
    /// which case every link keeps its native behavior.
    pub fn install(&self) -> Result<bool, JsValue> {
        if self.inner.installed.get() {
            return Ok(true);
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if page::find_shell(&document, &self.inner.config.shell_selector).is_none() {
            tracing::warn!(
                target: "vitrine::router",
                selector = %self.inner.config.shell_selector,
                "no shell element; router not installed"
            );
            return Ok(false);
        }

        let weak = Rc::downgrade(&self.inner);
        let click = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            handle_click(&inner, &event);
        }));
        document.add_event_listener_with_callback_and_bool(
            "click",
            click.as_ref().unchecked_ref(),
            true,
        )?;
        *self.inner.click_listener.borrow_mut() = Some(click);

        let weak = Rc::downgrade(&self.inner);
        let popstate = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            handle_popstate(&inner);
        }));
        window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;
        *self.inner.popstate_listener.borrow_mut() = Some(popstate);

        self.inner.installed.set(true);
        tracing::debug!(
            target: "vitrine::router",
            selector = %self.inner.config.shell_selector,
            "router installed"
        );
        Ok(true)
    }

    /// Detaches the listeners installed by [`install`](Router::install).
    pub fn uninstall(&self) {
        if !self.inner.installed.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(document) = window.document()
            && let Some(click) = self.inner.click_listener.borrow_mut().take()
        {
            let _ = document.remove_event_listener_with_callback_and_bool(
                "click",
                click.as_ref().unchecked_ref(),
                true,
            );
        }
        if let Some(popstate) = self.inner.popstate_listener.borrow_mut().take() {
            let _ = window
                .remove_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref());
        }
        self.inner.installed.set(false);
        tracing::debug!(target: "vitrine::router", "router uninstalled");
    }

    /// Programmatic navigation. Same-origin targets run a transition
    /// cycle; anything else falls back to a full page load.
    pub fn navigate(&self, url: &str, replace: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(current) = dom::current_location(&window) else {
            return;
        };
        match resolve_href(&current, url) {
            ResolvedHref::SameOrigin { path_and_query } => {
                let request = if replace {
                    NavRequest::replace(path_and_query)
                } else {
                    NavRequest::push(path_and_query)
                };
                spawn_load(&self.inner, request);
            }
            _ => {
                tracing::debug!(
                    target: "vitrine::router",
                    url,
                    "programmatic navigation leaves the origin; full load"
                );
                history::fallback_navigate(&window, url);
            }
        }
    }
}

/// Runs every registered re-render hook. Reentrant invocations (a hook
/// calling back into the registry) are skipped with a warning rather than
/// panicking on the inner borrow.
pub fn invoke_registry(registry: &Rc<RefCell<LifecycleRegistry>>) -> usize {
    match registry.try_borrow_mut() {
        Ok(mut registry) => registry.invoke_all(),
        Err(_) => {
            tracing::warn!(
                target: "vitrine::lifecycle",
                "re-render requested while a re-render pass is running; skipped"
            );
            0
        }
    }
}

fn spawn_load(inner: &Rc<RouterInner>, request: NavRequest) {
    let inner = Rc::clone(inner);
    spawn_local(inner.load(request));
}

fn handle_click(inner: &Rc<RouterInner>, event: &Event) {
    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(current) = dom::current_location(&window) else {
        return;
    };
    let click = dom::click_context(mouse);

    let decision = if let Some(anchor) = dom::anchor_from_event(event) {
        decide_anchor(&click, &dom::anchor_info(&anchor), &current)
    } else if let Some(button) = dom::button_from_event(event) {
        decide_button(&click, &dom::button_info(&button), &current)
    } else {
        return;
    };

    match decision {
        Decision::Bypass(reason) => {
            tracing::trace!(target: "vitrine::router", ?reason, "leaving click to the browser");
        }
        Decision::ScrollTo(id) => {
            let Some(document) = window.document() else {
                return;
            };
            let Some(target) = document.get_element_by_id(&id) else {
                tracing::trace!(
                    target: "vitrine::router",
                    id = %id,
                    "hash target missing; leaving click to the browser"
                );
                return;
            };
            event.prevent_default();
            history::scroll_into_view(&target, inner.config.smooth_scroll);
        }
        Decision::Navigate(path_and_query) => {
            event.prevent_default();
            spawn_load(inner, NavRequest::push(path_and_query));
        }
    }
}

/// Back/forward traversal reloads whatever the address bar now shows,
/// replacing the current entry instead of pushing over the traversal.
fn handle_popstate(inner: &Rc<RouterInner>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(path) = history::current_path_and_query(&window) else {
        return;
    };
    tracing::debug!(target: "vitrine::router", path = %path, "history traversal");
    spawn_load(inner, NavRequest::replace(path));
}

fn schedule_reinvoke(inner: &Rc<RouterInner>, token: NavToken) {
    let weak = Rc::downgrade(inner);
    dom::after_layout(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.is_stale(token) {
            tracing::trace!(
                target: "vitrine::router",
                "skipping re-render for a superseded navigation"
            );
            return;
        }
        invoke_registry(&inner.registry);
        inner.set_phase(LoadPhase::Idle);
    });
}

impl RouterInner {
    fn set_phase(&self, phase: LoadPhase) {
        self.phase.set(phase);
        tracing::trace!(target: "vitrine::router", phase = phase.as_str(), "phase");
    }

    fn is_stale(&self, token: NavToken) -> bool {
        token.is_stale(self.sequence.borrow().latest())
    }

    async fn load(self: Rc<Self>, request: NavRequest) {
        let token = self.sequence.borrow_mut().begin();
        tracing::debug!(
            target: "vitrine::router",
            url = %request.url,
            replace = request.replace,
            "navigation started"
        );
        match self.run_cycle(&request, token).await {
            Ok(CycleOutcome::Applied) => {
                tracing::debug!(target: "vitrine::router", url = %request.url, "navigation applied");
                schedule_reinvoke(&self, token);
            }
            Ok(CycleOutcome::Superseded) => {
                tracing::debug!(
                    target: "vitrine::router",
                    url = %request.url,
                    "navigation superseded by a newer one"
                );
            }
            Err(error) => {
                self.set_phase(LoadPhase::Idle);
                tracing::warn!(
                    target: "vitrine::router",
                    url = %request.url,
                    %error,
                    "transition failed; falling back to a full load"
                );
                if let Some(window) = web_sys::window() {
                    history::fallback_navigate(&window, &request.url);
                }
            }
        }
    }

    async fn run_cycle(
        &self,
        request: &NavRequest,
        token: NavToken,
    ) -> Result<CycleOutcome, NavError> {
        let window =
            web_sys::window().ok_or_else(|| NavError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| NavError::Dom("no document".to_string()))?;

        self.set_phase(LoadPhase::Fetching);
        let html = page::fetch_page(&window, &request.url, &self.config).await?;
        if self.is_stale(token) {
            return Ok(CycleOutcome::Superseded);
        }

        self.set_phase(LoadPhase::Parsing);
        let fetched = page::parse_page(&html, &request.url)?;
        let plan = {
            let tracker = self.tracker.borrow();
            AssetPlan::classify(
                page::collect_stylesheets(&fetched),
                page::collect_scripts(&fetched),
                tracker.policy(),
            )
        };
        for asset in &plan.skip {
            tracing::trace!(
                target: "vitrine::assets",
                kind = asset.kind.as_str(),
                url = %asset.url,
                "theme asset already loaded"
            );
        }

        self.set_phase(LoadPhase::Swapping);
        self.tracker.borrow_mut().remove_all(&document);
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.reset_to_baseline();
            }
            Err(_) => {
                tracing::warn!(target: "vitrine::lifecycle", "registry busy during reset");
            }
        }

        let mut pending = Vec::new();
        {
            let mut tracker = self.tracker.borrow_mut();
            for asset in &plan.load {
                match tracker.start_load(&document, asset.kind, &asset.url) {
                    Ok(load) => pending.push(load.wait()),
                    Err(error) => {
                        tracing::warn!(
                            target: "vitrine::assets",
                            url = %asset.url,
                            %error,
                            "could not start asset load"
                        );
                    }
                }
            }
        }
        for error in join_all(pending).await.into_iter().filter_map(Result::err) {
            // A 404'd stylesheet should not strand the whole transition.
            tracing::warn!(target: "vitrine::assets", %error, "continuing without asset");
        }
        if self.is_stale(token) {
            return Ok(CycleOutcome::Superseded);
        }

        let mode = page::swap_document(&document, &fetched, &self.config.shell_selector)?;
        if mode == SwapMode::WholeBody {
            tracing::warn!(
                target: "vitrine::router",
                selector = %self.config.shell_selector,
                "shell missing on one side; replaced whole body"
            );
        }
        page::apply_title(&document, &fetched);
        history::scroll_to_top(&window);

        self.set_phase(LoadPhase::Reinitializing);
        history::push_or_replace(&window, &request.url, request.replace)
            .map_err(|error| NavError::Dom(js_error_string(&error)))?;
        Ok(CycleOutcome::Applied)
    }
}
