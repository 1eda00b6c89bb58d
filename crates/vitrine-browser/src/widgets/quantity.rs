//! Product quantity stepper.
//!
//! Contract: a `[data-quantity]` root holding an `input[name="quantity"]`
//! and `[data-quantity-decrease]` / `[data-quantity-increase]` buttons.
//! The input's own `min`/`max` attributes define the bounds; buttons are
//! disabled at the edges and typed values are clamped as they come in.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

use vitrine_core::{QuantityBounds, WidgetError};

use super::Widget;

pub struct QuantityStepper {
    root: Element,
    listeners: Vec<EventListener>,
    attached: bool,
}

impl QuantityStepper {
    pub fn new(root: Element) -> Self {
        QuantityStepper {
            root,
            listeners: Vec::new(),
            attached: false,
        }
    }

    fn find<T: JsCast>(&self, selector: &str) -> Result<T, WidgetError> {
        self.root
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<T>().ok())
            .ok_or_else(|| WidgetError::MissingElement {
                widget: "quantity-stepper",
                selector: selector.to_string(),
            })
    }
}

impl Widget for QuantityStepper {
    fn name(&self) -> &'static str {
        "quantity-stepper"
    }

    fn attach(&mut self) -> Result<(), WidgetError> {
        if self.attached {
            return Ok(());
        }
        let input: HtmlInputElement = self.find(r#"input[name="quantity"]"#)?;
        let decrease: HtmlButtonElement = self.find("[data-quantity-decrease]")?;
        let increase: HtmlButtonElement = self.find("[data-quantity-increase]")?;

        let bounds = QuantityBounds::from_attrs(
            input.get_attribute("min").as_deref(),
            input.get_attribute("max").as_deref(),
        );

        sync(&input, &decrease, &increase, bounds, 0);

        for (button, delta) in [(&decrease, -1), (&increase, 1)] {
            let input = input.clone();
            let decrease = decrease.clone();
            let increase = increase.clone();
            self.listeners.push(EventListener::new_with_options(
                button,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    sync(&input, &decrease, &increase, bounds, delta);
                },
            ));
        }

        {
            let target = input.clone();
            let decrease = decrease.clone();
            let increase = increase.clone();
            self.listeners.push(EventListener::new(&input, "input", move |_event| {
                sync(&target, &decrease, &increase, bounds, 0);
            }));
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

/// Reads the field, applies `delta`, clamps, and writes the result back
/// along with the buttons' disabled states.
fn sync(
    input: &HtmlInputElement,
    decrease: &HtmlButtonElement,
    increase: &HtmlButtonElement,
    bounds: QuantityBounds,
    delta: i32,
) {
    let current = bounds.parse_value(&input.value());
    let next = bounds.step(current, delta);
    input.set_value(&next.to_string());
    decrease.set_disabled(bounds.at_min(next));
    increase.set_disabled(bounds.at_max(next));
}
