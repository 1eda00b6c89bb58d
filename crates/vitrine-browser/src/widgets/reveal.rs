//! Section reveal on scroll.
//!
//! Sections under `main` get a `visible` class once enough of them scrolls
//! into view; the theme's CSS animates the entrance. Sections already on
//! screen when the page appears, or any section while the page sits near
//! its top, reveal immediately so the first viewport never animates in
//! piecemeal. `[data-reveal-skip]` opts a section (or a whole container)
//! out, as do sticky-positioned sections, which would otherwise flicker
//! as their rect leaves the flow.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Window};

use vitrine_core::WidgetError;
use vitrine_core::viewport::{self, REVEAL_THRESHOLD};

use crate::dom;

use super::Widget;

const VISIBLE_CLASS: &str = "visible";
const SKIP_SELECTOR: &str = "[data-reveal-skip]";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct SectionReveal {
    main: Element,
    observer: Option<IntersectionObserver>,
    callback: Option<ObserverCallback>,
    attached: bool,
}

impl SectionReveal {
    pub fn new(main: Element) -> Self {
        SectionReveal {
            main,
            observer: None,
            callback: None,
            attached: false,
        }
    }
}

impl Widget for SectionReveal {
    fn name(&self) -> &'static str {
        "section-reveal"
    }

    fn attach(&mut self) -> Result<(), WidgetError> {
        if self.attached {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| WidgetError::Dom {
            widget: self.name(),
            message: "no window".to_string(),
        })?;

        let callback: ObserverCallback = Closure::wrap(Box::new(
            |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        let _ = target.class_list().add_1(VISIBLE_CLASS);
                        observer.unobserve(&target);
                    }
                }
            },
        ));

        let options = IntersectionObserverInit::new();
        options.set_threshold(&wasm_bindgen::JsValue::from_f64(REVEAL_THRESHOLD));
        // Pull the bottom edge in so sections peeking a few pixels above
        // the fold still wait for a real scroll.
        options.set_root_margin("0px 0px -20px 0px");
        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|error| WidgetError::Dom {
            widget: self.name(),
            message: dom::js_error_string(&error),
        })?;

        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let at_top = viewport::at_page_top(scroll_y);
        let viewport_height = inner_height(&window);

        for section in dom::scoped_elements(&self.main, "section") {
            if is_excluded(&window, &section) {
                let _ = section.class_list().add_1(VISIBLE_CLASS);
                continue;
            }
            let _ = section.class_list().remove_1(VISIBLE_CLASS);
            let rect = section.get_bounding_client_rect();
            if at_top
                || viewport::is_in_view(rect.top(), rect.bottom(), viewport_height, REVEAL_THRESHOLD)
            {
                let _ = section.class_list().add_1(VISIBLE_CLASS);
            } else {
                observer.observe(&section);
            }
        }

        self.observer = Some(observer);
        self.callback = Some(callback);
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.callback = None;
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

fn is_excluded(window: &Window, section: &Element) -> bool {
    if section.closest(SKIP_SELECTOR).ok().flatten().is_some() {
        return true;
    }
    if let Ok(Some(style)) = window.get_computed_style(section) {
        return style
            .get_property_value("position")
            .map(|position| position == "sticky")
            .unwrap_or(false);
    }
    false
}

fn inner_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0)
}
