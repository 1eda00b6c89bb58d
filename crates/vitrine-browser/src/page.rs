//! Fetching and applying page documents.
//!
//! A navigation fetches the next page as HTML, parses it into a detached
//! document, then copies the interesting parts across: the content shell's
//! inner markup (or the whole body when the shell is missing), the title,
//! and the page-scoped asset references.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, DomParser, Element, Request, RequestInit, Response, SupportedType,
    Window};

use vitrine_core::{NavError, RouterConfig};

use crate::dom::{self, js_error_string};

/// How a fetched page was applied to the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMode {
    /// The shell's inner markup was replaced.
    Shell,
    /// No shell on one side or the other; the whole body was replaced.
    WholeBody,
}

/// Fetches `path_and_query` and returns the raw HTML. The configured
/// marker header lets the server shape transition responses differently
/// from full page loads.
pub async fn fetch_page(
    window: &Window,
    path_and_query: &str,
    config: &RouterConfig,
) -> Result<String, NavError> {
    let network = |error: &wasm_bindgen::JsValue| NavError::Network {
        url: path_and_query.to_string(),
        message: js_error_string(error),
    };

    let init = RequestInit::new();
    init.set_method("GET");
    let request =
        Request::new_with_str_and_init(path_and_query, &init).map_err(|e| network(&e))?;
    request
        .headers()
        .set(&config.fetch_header_name, &config.fetch_header_value)
        .map_err(|e| network(&e))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| network(&e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| NavError::Network {
            url: path_and_query.to_string(),
            message: "fetch resolved to a non-Response value".to_string(),
        })?;

    if !response.ok() {
        return Err(NavError::Http {
            url: path_and_query.to_string(),
            status: response.status(),
        });
    }

    let body = JsFuture::from(response.text().map_err(|e| network(&e))?)
        .await
        .map_err(|e| network(&e))?;
    body.as_string().ok_or_else(|| NavError::Network {
        url: path_and_query.to_string(),
        message: "response body was not text".to_string(),
    })
}

/// Parses HTML into a detached document.
pub fn parse_page(html: &str, url: &str) -> Result<Document, NavError> {
    let parse_error = |error: &wasm_bindgen::JsValue| NavError::Parse {
        url: url.to_string(),
        message: js_error_string(error),
    };
    let parser = DomParser::new().map_err(|e| parse_error(&e))?;
    parser
        .parse_from_string(html, SupportedType::TextHtml)
        .map_err(|e| parse_error(&e))
}

/// The content shell of a document, when it has one.
pub fn find_shell(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Stylesheet hrefs referenced by a document, in document order.
pub fn collect_stylesheets(document: &Document) -> Vec<String> {
    collect_attribute(document, r#"link[rel="stylesheet"]"#, "href")
}

/// External script srcs referenced by a document, in document order.
pub fn collect_scripts(document: &Document) -> Vec<String> {
    collect_attribute(document, "script[src]", "src")
}

fn collect_attribute(document: &Document, selector: &str, attribute: &str) -> Vec<String> {
    dom::elements(document, selector)
        .into_iter()
        .filter_map(|element| element.get_attribute(attribute))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Copies the fetched page's content into the live document. Swaps shell
/// inner markup when both documents have a shell, otherwise replaces the
/// whole body.
pub fn swap_document(
    live: &Document,
    fetched: &Document,
    selector: &str,
) -> Result<SwapMode, NavError> {
    let live_shell = find_shell(live, selector);
    let fetched_shell = find_shell(fetched, selector);
    if let (Some(live_shell), Some(fetched_shell)) = (&live_shell, &fetched_shell) {
        live_shell.set_inner_html(&fetched_shell.inner_html());
        return Ok(SwapMode::Shell);
    }

    let missing = || NavError::MissingShell {
        selector: selector.to_string(),
    };
    let live_body = live.body().ok_or_else(missing)?;
    let fetched_body = fetched.body().ok_or_else(missing)?;
    live_body.set_inner_html(&fetched_body.inner_html());
    Ok(SwapMode::WholeBody)
}

/// Carries the fetched page's title over, when it has one.
pub fn apply_title(live: &Document, fetched: &Document) {
    let title = fetched.title();
    if !title.is_empty() {
        live.set_title(&title);
    }
}
