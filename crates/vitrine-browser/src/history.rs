//! History and scroll coordination.

use wasm_bindgen::JsValue;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollRestoration, Window};

use crate::dom::js_error_string;

/// Path plus query of the current document, straight off `location`.
pub fn current_path_and_query(window: &Window) -> Option<String> {
    let location = window.location();
    let pathname = location.pathname().ok()?;
    let search = location.search().ok()?;
    if search.is_empty() {
        Some(pathname)
    } else {
        Some(format!("{pathname}{search}"))
    }
}

/// Records a finished navigation in session history. Pushes a new entry,
/// or replaces the current one for popstate-driven loads. Pushing the
/// path already shown is skipped so programmatic reloads do not stack
/// duplicate entries.
pub fn push_or_replace(window: &Window, path_and_query: &str, replace: bool) -> Result<(), JsValue> {
    let history = window.history()?;
    if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path_and_query))?;
        return Ok(());
    }
    if current_path_and_query(window).as_deref() == Some(path_and_query) {
        return Ok(());
    }
    history.push_state_with_url(&JsValue::NULL, "", Some(path_and_query))?;
    Ok(())
}

/// Takes scroll restoration away from the browser so swapped-in pages
/// always start at the top instead of a stale offset.
pub fn set_manual_scroll_restoration(window: &Window) {
    let Ok(history) = window.history() else {
        return;
    };
    if let Err(error) = history.set_scroll_restoration(ScrollRestoration::Manual) {
        tracing::debug!(
            target: "vitrine::history",
            error = %js_error_string(&error),
            "manual scrollRestoration unavailable"
        );
    }
}

pub fn scroll_to_top(window: &Window) {
    window.scroll_to_with_x_and_y(0.0, 0.0);
}

/// Brings `element` to the top of the viewport, animated when the config
/// asks for it.
pub fn scroll_into_view(element: &Element, smooth: bool) {
    if smooth {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    } else {
        element.scroll_into_view();
    }
}

/// Full-page navigation, used when a client-side cycle cannot complete.
pub fn fallback_navigate(window: &Window, url: &str) {
    if let Err(error) = window.location().assign(url) {
        tracing::warn!(
            target: "vitrine::history",
            url,
            error = %js_error_string(&error),
            "fallback navigation failed"
        );
    }
}
