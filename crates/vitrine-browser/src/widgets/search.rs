//! Search overlay.
//!
//! Contract: a `[data-search]` section holding the input and form, a
//! `[data-search-results]` panel, `[data-search-trigger]` toggles anywhere
//! in the document, and an optional `[data-search-close]` button inside
//! the results panel. Visibility is driven through the `is-visible` class.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement};

use vitrine_core::WidgetError;

use crate::dom;

use super::Widget;

/// Keystroke settle time before the results panel reacts.
const DEBOUNCE_MS: u32 = 300;
/// Focus is deferred until the overlay's entrance transition has mostly
/// played, so the caret does not appear mid-slide.
const FOCUS_DELAY_MS: u32 = 200;
/// Gap between hiding the results panel and the section behind it.
const HIDE_DELAY_MS: u32 = 100;

const VISIBLE_CLASS: &str = "is-visible";

pub struct SearchOverlay {
    state: Rc<SearchState>,
    listeners: Vec<EventListener>,
    attached: bool,
}

struct SearchState {
    section: HtmlElement,
    results: HtmlElement,
    input: Option<HtmlInputElement>,
    visible: Cell<bool>,
    timers: RefCell<SearchTimers>,
}

#[derive(Default)]
struct SearchTimers {
    debounce: Option<Timeout>,
    focus: Option<Timeout>,
    hide: Option<Timeout>,
}

impl SearchOverlay {
    pub fn new(section: HtmlElement, results: HtmlElement) -> Self {
        let input = section
            .query_selector("input")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
        SearchOverlay {
            state: Rc::new(SearchState {
                section,
                results,
                input,
                visible: Cell::new(false),
                timers: RefCell::new(SearchTimers::default()),
            }),
            listeners: Vec::new(),
            attached: false,
        }
    }
}

impl Widget for SearchOverlay {
    fn name(&self) -> &'static str {
        "search-overlay"
    }

    fn attach(&mut self) -> Result<(), WidgetError> {
        if self.attached {
            return Ok(());
        }
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| WidgetError::Dom {
                widget: self.name(),
                message: "no document".to_string(),
            })?;

        // Start hidden without letting the close transition play.
        hide_without_transition(&self.state.section);
        hide_without_transition(&self.state.results);
        self.state.visible.set(false);

        if let Some(input) = &self.state.input {
            let state = Rc::clone(&self.state);
            self.listeners.push(EventListener::new(input, "input", move |_event| {
                let Some(input) = state.input.as_ref() else {
                    return;
                };
                let query = input.value();
                let mut timers = state.timers.borrow_mut();
                timers.debounce = None;
                if query.trim().is_empty() {
                    let _ = state.results.class_list().remove_1(VISIBLE_CLASS);
                    return;
                }
                let settle = Rc::clone(&state);
                timers.debounce = Some(Timeout::new(DEBOUNCE_MS, move || {
                    if settle.visible.get() {
                        let _ = settle.results.class_list().add_1(VISIBLE_CLASS);
                    }
                }));
            }));
        }

        if let Ok(Some(form)) = self.state.section.query_selector("form") {
            self.listeners.push(EventListener::new_with_options(
                &form,
                "submit",
                EventListenerOptions::enable_prevent_default(),
                |event| {
                    event.prevent_default();
                },
            ));
        }

        for trigger in dom::elements(&document, "[data-search-trigger]") {
            let state = Rc::clone(&self.state);
            self.listeners.push(EventListener::new_with_options(
                &trigger,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    event.stop_propagation();
                    if state.visible.get() {
                        hide(&state);
                    } else {
                        show(&state);
                    }
                },
            ));
        }

        if let Ok(Some(close)) = self.state.results.query_selector("[data-search-close]") {
            let state = Rc::clone(&self.state);
            self.listeners.push(EventListener::new(&close, "click", move |event| {
                event.stop_propagation();
                hide(&state);
            }));
        }

        let state = Rc::clone(&self.state);
        self.listeners.push(EventListener::new(&document, "click", move |event| {
            if !state.visible.get() {
                return;
            }
            let Some(target) = dom::event_target_element(event) else {
                return;
            };
            let node = target.unchecked_ref::<web_sys::Node>();
            if state.section.contains(Some(node)) || state.results.contains(Some(node)) {
                return;
            }
            hide(&state);
        }));

        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.listeners.clear();
        *self.state.timers.borrow_mut() = SearchTimers::default();
        self.state.visible.set(false);
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

fn show(state: &Rc<SearchState>) {
    state.visible.set(true);
    let _ = state.section.class_list().add_1(VISIBLE_CLASS);
    let input = state.input.clone();
    state.timers.borrow_mut().focus = Some(Timeout::new(FOCUS_DELAY_MS, move || {
        if let Some(input) = input {
            let _ = input.focus();
        }
    }));
}

fn hide(state: &Rc<SearchState>) {
    state.visible.set(false);
    let mut timers = state.timers.borrow_mut();
    timers.debounce = None;
    let _ = state.results.class_list().remove_1(VISIBLE_CLASS);
    let section = state.section.clone();
    let input = state.input.clone();
    timers.hide = Some(Timeout::new(HIDE_DELAY_MS, move || {
        let _ = section.class_list().remove_1(VISIBLE_CLASS);
        if let Some(input) = input {
            input.set_value("");
        }
    }));
}

/// Removes the visible class with transitions suppressed, so a rebuild
/// mid-animation cannot leave a half-open overlay.
fn hide_without_transition(element: &HtmlElement) {
    let style = element.style();
    let _ = style.set_property("transition", "none");
    let _ = element.class_list().remove_1(VISIBLE_CLASS);
    dom::force_reflow(element);
    let _ = style.remove_property("transition");
}
