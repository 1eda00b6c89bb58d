//! Dropdown navigation menus.
//!
//! Contract: a `nav` root containing `button[data-menu-trigger="name"]`
//! triggers and `[data-menu-panel="name"]` panels. The widget drives the
//! `data-visible`, `data-aligned`, and `data-open` attributes plus the
//! inline geometry; the theme's CSS supplies the transitions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use smol_str::SmolStr;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use vitrine_core::WidgetError;
use vitrine_core::placement::{DEFAULT_EDGE_PADDING, PanelAlignment, PanelPlacement, max_panel_width};

use crate::dom;

use super::Widget;

/// Matches the theme's panel open/close transition so styles are only
/// reset once the panel has finished fading out.
const TRANSITION_MS: u32 = 200;

pub struct DropdownNav {
    state: Rc<NavState>,
    listeners: Vec<EventListener>,
    attached: bool,
}

struct NavState {
    root: Element,
    panels: Vec<Element>,
    open: RefCell<Option<SmolStr>>,
    close_timers: RefCell<HashMap<SmolStr, Timeout>>,
}

impl DropdownNav {
    pub fn new(root: Element) -> Self {
        let panels = dom::scoped_elements(&root, "[data-menu-panel]");
        DropdownNav {
            state: Rc::new(NavState {
                root,
                panels,
                open: RefCell::new(None),
                close_timers: RefCell::new(HashMap::new()),
            }),
            listeners: Vec::new(),
            attached: false,
        }
    }
}

impl Widget for DropdownNav {
    fn name(&self) -> &'static str {
        "dropdown-nav"
    }

    fn attach(&mut self) -> Result<(), WidgetError> {
        if self.attached {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| WidgetError::Dom {
            widget: self.name(),
            message: "no window".to_string(),
        })?;
        let document = window.document().ok_or_else(|| WidgetError::Dom {
            widget: self.name(),
            message: "no document".to_string(),
        })?;

        for panel in &self.state.panels {
            let _ = panel.set_attribute("data-visible", "false");
            reset_panel_styles(panel);
            if let Some(name) = panel_name(panel) {
                mark_trigger(&self.state, &name, false);
            }
        }

        for trigger in dom::scoped_elements(&self.state.root, "button[data-menu-trigger]") {
            let Some(name) = trigger.get_attribute("data-menu-trigger") else {
                continue;
            };
            let name = SmolStr::new(name);
            let state = Rc::clone(&self.state);
            self.listeners.push(EventListener::new_with_options(
                &trigger,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    event.stop_propagation();
                    toggle(&state, &name);
                },
            ));
        }

        // Clicking outside the nav, or opening the search overlay, closes
        // whatever is open.
        let state = Rc::clone(&self.state);
        self.listeners.push(EventListener::new(&document, "click", move |event| {
            let Some(target) = dom::event_target_element(event) else {
                return;
            };
            if target
                .closest("[data-search-trigger]")
                .ok()
                .flatten()
                .is_some()
            {
                close_all(&state);
                return;
            }
            if !state
                .root
                .contains(Some(target.unchecked_ref::<web_sys::Node>()))
            {
                close_all(&state);
            }
        }));

        let state = Rc::clone(&self.state);
        self.listeners.push(EventListener::new(&window, "resize", move |_event| {
            let open = state.open.borrow().clone();
            if let Some(name) = open {
                position_panel(&state, &name);
            }
        }));

        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.listeners.clear();
        self.state.close_timers.borrow_mut().clear();
        *self.state.open.borrow_mut() = None;
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

fn panel_name(panel: &Element) -> Option<String> {
    panel.get_attribute("data-menu-panel")
}

fn find_panel(state: &NavState, name: &str) -> Option<Element> {
    state
        .panels
        .iter()
        .find(|panel| panel_name(panel).as_deref() == Some(name))
        .cloned()
}

fn toggle(state: &Rc<NavState>, name: &SmolStr) {
    let was_open = state.open.borrow().as_deref() == Some(name.as_str());
    for panel in &state.panels {
        if panel_name(panel).as_deref() != Some(name.as_str()) {
            close_panel(state, panel);
        }
    }
    let Some(panel) = find_panel(state, name) else {
        return;
    };
    if was_open {
        close_panel(state, &panel);
    } else {
        open_panel(state, name, &panel);
    }
}

fn close_all(state: &Rc<NavState>) {
    for panel in &state.panels {
        close_panel(state, panel);
    }
}

fn open_panel(state: &Rc<NavState>, name: &SmolStr, panel: &Element) {
    state.close_timers.borrow_mut().remove(name);
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(html) = panel.clone().dyn_into::<HtmlElement>() else {
        return;
    };

    let style = html.style();
    let _ = style.set_property("display", "flex");
    dom::force_reflow(&html);
    mark_trigger(state, name, true);

    let viewport = inner_width(&window);
    let max_width = max_panel_width(viewport, DEFAULT_EDGE_PADDING);
    if panel.get_bounding_client_rect().width() > max_width {
        let _ = style.set_property("max-width", &format!("{max_width}px"));
    } else {
        let _ = style.remove_property("max-width");
    }
    let _ = style.set_property("transform", "translate(-50%, -10px)");

    *state.open.borrow_mut() = Some(name.clone());

    let state = Rc::clone(state);
    let name = name.clone();
    dom::next_frame(move || {
        position_panel(&state, &name);
        if let Some(panel) = find_panel(&state, &name) {
            let _ = panel.set_attribute("data-visible", "true");
        }
    });
}

fn close_panel(state: &Rc<NavState>, panel: &Element) {
    if panel.get_attribute("data-visible").as_deref() != Some("true") {
        return;
    }
    let Some(name) = panel_name(panel).map(SmolStr::new) else {
        return;
    };
    let _ = panel.set_attribute("data-visible", "false");
    mark_trigger(state, &name, false);
    {
        let mut open = state.open.borrow_mut();
        if open.as_deref() == Some(name.as_str()) {
            *open = None;
        }
    }

    let panel = panel.clone();
    let timers = Rc::clone(state);
    let timer_name = name.clone();
    let timeout = Timeout::new(TRANSITION_MS, move || {
        timers.close_timers.borrow_mut().remove(&timer_name);
        // Only reset if nothing reopened the panel meanwhile.
        if panel.get_attribute("data-visible").as_deref() == Some("false") {
            reset_panel_styles(&panel);
        }
    });
    state.close_timers.borrow_mut().insert(name, timeout);
}

/// Applies the placement the geometry picked: centered under the parent
/// where it fits, pinned to a viewport edge where it does not.
fn position_panel(state: &Rc<NavState>, name: &str) {
    let Some(panel) = find_panel(state, name) else {
        return;
    };
    let Some(parent) = panel.parent_element() else {
        return;
    };
    let Ok(html) = panel.clone().dyn_into::<HtmlElement>() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let panel_rect = panel.get_bounding_client_rect();
    let parent_rect = parent.get_bounding_client_rect();
    let placement = PanelPlacement::compute(
        panel_rect.width(),
        parent_rect.left(),
        parent_rect.width(),
        inner_width(&window),
        DEFAULT_EDGE_PADDING,
    );

    let style = html.style();
    match placement {
        PanelPlacement::Centered => {
            let _ = style.set_property("left", "50%");
            let _ = style.set_property("transform", "translate(-50%, 0)");
            let _ = panel.remove_attribute("data-aligned");
        }
        PanelPlacement::Edge { left_px, alignment } => {
            let _ = style.set_property("left", &format!("{left_px}px"));
            let _ = style.set_property("transform", "translate(0, 0)");
            let _ = panel.set_attribute(
                "data-aligned",
                match alignment {
                    PanelAlignment::Left => "left",
                    PanelAlignment::Right => "right",
                },
            );
        }
    }
}

fn mark_trigger(state: &NavState, name: &str, open: bool) {
    let selector = format!("button[data-menu-trigger=\"{name}\"]");
    for trigger in dom::scoped_elements(&state.root, &selector) {
        let _ = trigger.set_attribute("data-open", if open { "true" } else { "false" });
    }
}

fn reset_panel_styles(panel: &Element) {
    let Ok(html) = panel.clone().dyn_into::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let _ = style.remove_property("display");
    let _ = style.remove_property("left");
    let _ = style.remove_property("transform");
    let _ = style.remove_property("max-width");
    let _ = panel.remove_attribute("data-aligned");
}

fn inner_width(window: &web_sys::Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}
