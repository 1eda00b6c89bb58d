//! Slide-in side panels (cart, filters, mobile menu).
//!
//! Contract: `[data-panel="name"]` panels, `[data-panel-trigger="name"]`
//! toggles anywhere in the document, and optional `[data-panel-close]`
//! buttons inside each panel. At most one panel is open at a time.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use web_sys::Element;

use vitrine_core::WidgetError;

use crate::dom;

use super::Widget;

const VISIBLE_CLASS: &str = "is-visible";

pub struct SidePanelGroup {
    state: Rc<PanelState>,
    listeners: Vec<EventListener>,
    attached: bool,
}

struct PanelState {
    panels: Vec<Element>,
}

impl SidePanelGroup {
    pub fn new(panels: Vec<Element>) -> Self {
        SidePanelGroup {
            state: Rc::new(PanelState { panels }),
            listeners: Vec::new(),
            attached: false,
        }
    }
}

impl Widget for SidePanelGroup {
    fn name(&self) -> &'static str {
        "side-panels"
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

        for panel in &self.state.panels {
            let _ = panel.class_list().remove_1(VISIBLE_CLASS);
        }

        for trigger in dom::elements(&document, "[data-panel-trigger]") {
            let Some(name) = trigger.get_attribute("data-panel-trigger") else {
                continue;
            };
            let state = Rc::clone(&self.state);
            self.listeners.push(EventListener::new_with_options(
                &trigger,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    toggle(&state, &name);
                },
            ));
        }

        for panel in &self.state.panels {
            if let Ok(Some(close)) = panel.query_selector("[data-panel-close]") {
                let panel = panel.clone();
                self.listeners.push(EventListener::new(&close, "click", move |_event| {
                    let _ = panel.class_list().remove_1(VISIBLE_CLASS);
                }));
            }
        }

        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.listeners.clear();
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

fn toggle(state: &PanelState, name: &str) {
    let Some(target) = state
        .panels
        .iter()
        .find(|panel| panel.get_attribute("data-panel").as_deref() == Some(name))
    else {
        return;
    };
    let opening = !target.class_list().contains(VISIBLE_CLASS);
    for panel in &state.panels {
        let _ = panel.class_list().remove_1(VISIBLE_CLASS);
    }
    if opening {
        let _ = target.class_list().add_1(VISIBLE_CLASS);
    }
}
