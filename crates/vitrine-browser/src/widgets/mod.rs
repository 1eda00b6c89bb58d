//! Theme widgets rebuilt after every page transition.
//!
//! Widgets are discovered from `data-*` contract attributes in the
//! current document, attached, and torn down again wholesale before the
//! next page's set is derived. Listener registrations live inside each
//! widget and die with it, so a swap can never leave callbacks pointing
//! at removed elements.

mod dropdown_nav;
mod quantity;
mod reveal;
mod search;
mod side_panel;

pub use dropdown_nav::DropdownNav;
pub use quantity::QuantityStepper;
pub use reveal::SectionReveal;
pub use search::SearchOverlay;
pub use side_panel::SidePanelGroup;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::Document;

use vitrine_core::{Hook, HookError, WidgetError};

use crate::dom;

/// One piece of page behavior with an attach/detach lifecycle.
pub trait Widget {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Wires the widget to its elements. Attaching an already attached
    /// widget is a no-op.
    fn attach(&mut self) -> Result<(), WidgetError>;

    /// Drops every listener and timer the widget holds.
    fn detach(&mut self);

    fn is_attached(&self) -> bool;
}

/// The widgets currently alive in the document.
#[derive(Default)]
pub struct WidgetSet {
    widgets: Vec<Box<dyn Widget>>,
}

impl WidgetSet {
    pub fn new() -> Self {
        WidgetSet::default()
    }

    /// Tears down the previous set and derives a fresh one from the
    /// document. A widget that fails to attach is logged and skipped; the
    /// rest of the set still comes up.
    pub fn rebuild(&mut self, document: &Document) {
        self.detach_all();
        self.widgets = discover(document);
        for widget in &mut self.widgets {
            if let Err(error) = widget.attach() {
                tracing::warn!(
                    target: "vitrine::widgets",
                    widget = widget.name(),
                    %error,
                    "widget attach failed"
                );
            }
        }
        tracing::debug!(
            target: "vitrine::widgets",
            count = self.widgets.len(),
            "widget set rebuilt"
        );
    }

    pub fn detach_all(&mut self) {
        for widget in &mut self.widgets {
            widget.detach();
        }
        self.widgets.clear();
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Re-render hook that rebuilds this set from the live document.
    pub fn lifecycle_hook(set: Rc<RefCell<WidgetSet>>) -> Hook {
        Box::new(move || {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| HookError::from("no document to rebuild widgets from"))?;
            let mut set = set
                .try_borrow_mut()
                .map_err(|_| HookError::from("widget set already rebuilding"))?;
            set.rebuild(&document);
            Ok(())
        })
    }
}

/// Derives the widget set the current document calls for.
pub fn discover(document: &Document) -> Vec<Box<dyn Widget>> {
    let mut widgets: Vec<Box<dyn Widget>> = Vec::new();

    for nav in dom::elements(document, "nav") {
        if nav.query_selector("[data-menu-panel]").ok().flatten().is_some() {
            widgets.push(Box::new(DropdownNav::new(nav)));
        }
    }

    if let (Ok(Some(section)), Ok(Some(results))) = (
        document.query_selector("[data-search]"),
        document.query_selector("[data-search-results]"),
    ) && let (Ok(section), Ok(results)) = (
        section.dyn_into::<web_sys::HtmlElement>(),
        results.dyn_into::<web_sys::HtmlElement>(),
    ) {
        widgets.push(Box::new(SearchOverlay::new(section, results)));
    }

    let panels = dom::elements(document, "[data-panel]");
    if !panels.is_empty() {
        widgets.push(Box::new(SidePanelGroup::new(panels)));
    }

    for root in dom::elements(document, "[data-quantity]") {
        widgets.push(Box::new(QuantityStepper::new(root)));
    }

    if let Ok(Some(main)) = document.query_selector("main") {
        widgets.push(Box::new(SectionReveal::new(main)));
    }

    widgets
}
