//! WASM browser tests for vitrine-browser.
//!
//! Run with: `wasm-pack test --headless --chrome` or `--firefox`

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use vitrine_browser::widgets::{
    DropdownNav, QuantityStepper, SearchOverlay, SidePanelGroup, Widget, WidgetSet, discover,
};
use vitrine_browser::{AssetTracker, SwapMode, dom, history, page};
use vitrine_core::{
    AnchorInfo, AssetKind, BypassReason, Decision, GlobalAssetPolicy, WidgetError, decide_anchor,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(html: &str) -> web_sys::Element {
    let document = document();
    let container = document.create_element("div").unwrap();
    container.set_inner_html(html);
    document.body().unwrap().append_child(&container).unwrap();
    container
}

fn as_html(element: &web_sys::Element) -> web_sys::HtmlElement {
    element.clone().dyn_into().unwrap()
}

fn query(root: &web_sys::Element, selector: &str) -> web_sys::Element {
    root.query_selector(selector).unwrap().unwrap()
}

// === Click snapshot tests ===

#[wasm_bindgen_test]
fn test_anchor_snapshot_reads_raw_attributes() {
    let container = mount(r#"<a href="/collections/lamps" target="_blank" download>Lamps</a>"#);
    let anchor: web_sys::HtmlAnchorElement = query(&container, "a").dyn_into().unwrap();

    let info = dom::anchor_info(&anchor);
    assert_eq!(info.href.as_deref(), Some("/collections/lamps"));
    assert_eq!(info.target.as_deref(), Some("_blank"));
    assert!(info.download);

    container.remove();
}

#[wasm_bindgen_test]
fn test_button_snapshot_reads_onclick() {
    let container =
        mount(r#"<button onclick="window.location.href = '/pages/about'">About</button>"#);
    let button: web_sys::HtmlButtonElement = query(&container, "button").dyn_into().unwrap();

    let info = dom::button_info(&button);
    assert_eq!(
        info.onclick.as_deref(),
        Some("window.location.href = '/pages/about'")
    );

    container.remove();
}

#[wasm_bindgen_test]
fn test_click_context_captures_modifiers() {
    let init = web_sys::MouseEventInit::new();
    init.set_bubbles(true);
    init.set_ctrl_key(true);
    let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();

    let context = dom::click_context(&event);
    assert!(context.ctrl);
    assert!(context.is_modified());
    assert_eq!(context.button, 0);
}

#[wasm_bindgen_test]
fn test_anchor_found_through_nested_markup() {
    let container = mount(r#"<a href="/collections/lamps"><span>Lamps</span></a>"#);
    let seen: Rc<RefCell<Option<AnchorInfo>>> = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&seen);
    let listener = EventListener::new_with_options(
        &container,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            // Stop the harness page from actually navigating.
            event.prevent_default();
            *sink.borrow_mut() =
                dom::anchor_from_event(event).map(|anchor| dom::anchor_info(&anchor));
        },
    );

    as_html(&query(&container, "span")).click();
    drop(listener);

    let info = seen.borrow().clone().expect("anchor above click target");
    assert_eq!(info.href.as_deref(), Some("/collections/lamps"));

    container.remove();
}

#[wasm_bindgen_test]
fn test_same_route_click_bypasses_from_live_location() {
    let window = web_sys::window().unwrap();
    let current = dom::current_location(&window).unwrap();

    let anchor = AnchorInfo::with_href(current.path_and_query());
    let decision = decide_anchor(&Default::default(), &anchor, &current);
    assert_eq!(decision, Decision::Bypass(BypassReason::SameRoute));
}

// === Page document tests ===

#[wasm_bindgen_test]
fn test_parsed_page_exposes_shell_title_and_assets() {
    let html = r#"<html><head><title>Pendant Lamp</title>
        <link rel="stylesheet" href="/assets/vitrine-theme.css">
        <link rel="stylesheet" href="/assets/product.css">
        <script src="/assets/product.js"></script>
        </head><body><div class="vitrine-shell"><h1>Pendant Lamp</h1></div></body></html>"#;

    let parsed = page::parse_page(html, "/products/pendant-lamp").unwrap();
    assert!(page::find_shell(&parsed, ".vitrine-shell").is_some());
    assert_eq!(
        page::collect_stylesheets(&parsed),
        vec![
            "/assets/vitrine-theme.css".to_string(),
            "/assets/product.css".to_string(),
        ]
    );
    assert_eq!(
        page::collect_scripts(&parsed),
        vec!["/assets/product.js".to_string()]
    );
}

#[wasm_bindgen_test]
fn test_swap_replaces_shell_content() {
    let live = page::parse_page(
        r#"<html><body><header>kept</header><div class="vitrine-shell"><p>old</p></div></body></html>"#,
        "/",
    )
    .unwrap();
    let fetched = page::parse_page(
        r#"<html><head><title>Next</title></head><body><div class="vitrine-shell"><p>new</p></div></body></html>"#,
        "/next",
    )
    .unwrap();

    let mode = page::swap_document(&live, &fetched, ".vitrine-shell").unwrap();
    assert_eq!(mode, SwapMode::Shell);

    let shell = page::find_shell(&live, ".vitrine-shell").unwrap();
    assert!(shell.inner_html().contains("new"));
    // Content outside the shell is untouched.
    assert!(live.query_selector("header").unwrap().is_some());

    page::apply_title(&live, &fetched);
    assert_eq!(live.title(), "Next");
}

#[wasm_bindgen_test]
fn test_swap_without_shell_replaces_body() {
    let live = page::parse_page(
        r#"<html><body><div class="vitrine-shell"><p>old</p></div></body></html>"#,
        "/",
    )
    .unwrap();
    let fetched =
        page::parse_page(r#"<html><body><main><p>bare</p></main></body></html>"#, "/next").unwrap();

    let mode = page::swap_document(&live, &fetched, ".vitrine-shell").unwrap();
    assert_eq!(mode, SwapMode::WholeBody);
    assert!(live.body().unwrap().inner_html().contains("bare"));
}

// === Asset tracking tests ===

#[wasm_bindgen_test]
fn test_tracker_records_and_removes() {
    let document = document();
    let mut tracker = AssetTracker::new(GlobalAssetPolicy::new(["vendors.js"]));

    let url = "data:text/css,.recorded%7Bcolor%3Ared%7D";
    let load = tracker
        .start_load(&document, AssetKind::Stylesheet, url)
        .unwrap();
    assert_eq!(load.url(), url);
    assert!(tracker.tracked().contains(AssetKind::Stylesheet, url));

    let selector = format!("link[href=\"{url}\"]");
    assert!(document.query_selector(&selector).unwrap().is_some());

    tracker.remove_all(&document);
    assert!(tracker.tracked().is_empty());
    assert!(document.query_selector(&selector).unwrap().is_none());

    // Removing again is a no-op.
    tracker.remove_all(&document);
}

#[wasm_bindgen_test]
async fn test_stylesheet_load_resolves() {
    let document = document();
    let mut tracker = AssetTracker::new(GlobalAssetPolicy::new(["vendors.js"]));

    let load = tracker
        .start_load(
            &document,
            AssetKind::Stylesheet,
            "data:text/css,.loaded%7B%7D",
        )
        .unwrap();
    load.wait().await.unwrap();

    tracker.remove_all(&document);
}

#[wasm_bindgen_test]
async fn test_missing_script_reports_error() {
    let document = document();
    let mut tracker = AssetTracker::new(GlobalAssetPolicy::new(["vendors.js"]));

    let load = tracker
        .start_load(&document, AssetKind::Script, "/no-such-asset-for-test.js")
        .unwrap();
    assert!(load.wait().await.is_err());

    tracker.remove_all(&document);
}

// === Widget tests ===

const QUANTITY_MARKUP: &str = r#"<div data-quantity>
    <button data-quantity-decrease>-</button>
    <input type="number" name="quantity" value="1" min="1" max="5">
    <button data-quantity-increase>+</button>
</div>"#;

#[wasm_bindgen_test]
fn test_quantity_stepper_steps_and_clamps() {
    let container = mount(QUANTITY_MARKUP);
    let root = query(&container, "[data-quantity]");
    let input: web_sys::HtmlInputElement =
        query(&container, "input[name=\"quantity\"]").dyn_into().unwrap();
    let increase = as_html(&query(&container, "[data-quantity-increase]"));
    let decrease = as_html(&query(&container, "[data-quantity-decrease]"));

    let mut stepper = QuantityStepper::new(root);
    stepper.attach().unwrap();

    // At the minimum the decrease button starts disabled.
    let decrease_button: web_sys::HtmlButtonElement = decrease.clone().dyn_into().unwrap();
    assert!(decrease_button.disabled());

    increase.click();
    assert_eq!(input.value(), "2");
    increase.click();
    assert_eq!(input.value(), "3");
    decrease.click();
    assert_eq!(input.value(), "2");

    // Typed values are clamped to the max from the markup.
    input.set_value("40");
    input
        .dispatch_event(&web_sys::Event::new("input").unwrap())
        .unwrap();
    assert_eq!(input.value(), "5");
    let increase_button: web_sys::HtmlButtonElement = increase.clone().dyn_into().unwrap();
    assert!(increase_button.disabled());

    stepper.detach();
    increase.click();
    assert_eq!(input.value(), "5", "detached stepper ignores clicks");

    container.remove();
}

#[wasm_bindgen_test]
fn test_quantity_stepper_requires_contract_markup() {
    let container = mount(r#"<div data-quantity><input name="quantity" value="1"></div>"#);
    let root = query(&container, "[data-quantity]");

    let mut stepper = QuantityStepper::new(root);
    match stepper.attach() {
        Err(WidgetError::MissingElement { widget, .. }) => assert_eq!(widget, "quantity-stepper"),
        other => panic!("expected missing element error, got {other:?}"),
    }
    assert!(!stepper.is_attached());

    container.remove();
}

#[wasm_bindgen_test]
fn test_side_panels_swap_open_panel() {
    let container = mount(
        r#"<button data-panel-trigger="cart">Cart</button>
        <button data-panel-trigger="filters">Filters</button>
        <aside data-panel="cart"><button data-panel-close>x</button></aside>
        <aside data-panel="filters"><button data-panel-close>x</button></aside>"#,
    );
    let cart = query(&container, "[data-panel=\"cart\"]");
    let filters = query(&container, "[data-panel=\"filters\"]");

    let mut group = SidePanelGroup::new(vec![cart.clone(), filters.clone()]);
    group.attach().unwrap();

    as_html(&query(&container, "[data-panel-trigger=\"cart\"]")).click();
    assert!(cart.class_list().contains("is-visible"));
    assert!(!filters.class_list().contains("is-visible"));

    // Opening the second panel closes the first.
    as_html(&query(&container, "[data-panel-trigger=\"filters\"]")).click();
    assert!(!cart.class_list().contains("is-visible"));
    assert!(filters.class_list().contains("is-visible"));

    // A second click on the same trigger closes it.
    as_html(&query(&container, "[data-panel-trigger=\"filters\"]")).click();
    assert!(!filters.class_list().contains("is-visible"));

    as_html(&query(&container, "[data-panel-trigger=\"cart\"]")).click();
    as_html(&query(&cart, "[data-panel-close]")).click();
    assert!(!cart.class_list().contains("is-visible"));

    group.detach();
    container.remove();
}

#[wasm_bindgen_test]
async fn test_search_overlay_toggles() {
    let container = mount(
        r#"<button data-search-trigger>Search</button>
        <section data-search><form><input type="search" name="q"></form></section>
        <div data-search-results><button data-search-close>x</button></div>"#,
    );
    let section = as_html(&query(&container, "[data-search]"));
    let results = as_html(&query(&container, "[data-search-results]"));

    let mut overlay = SearchOverlay::new(section.clone(), results.clone());
    overlay.attach().unwrap();
    assert!(!section.class_list().contains("is-visible"));

    as_html(&query(&container, "[data-search-trigger]")).click();
    assert!(section.class_list().contains("is-visible"));

    // A click outside the overlay hides it after the exit transition.
    document().body().unwrap().click();
    assert!(!results.class_list().contains("is-visible"));
    TimeoutFuture::new(200).await;
    assert!(!section.class_list().contains("is-visible"));

    overlay.detach();
    container.remove();
}

#[wasm_bindgen_test]
async fn test_dropdown_opens_positions_and_closes() {
    let container = mount(
        r#"<nav><ul><li>
        <button data-menu-trigger="shop">Shop</button>
        <div data-menu-panel="shop"><a href="/collections/all">All</a></div>
        </li></ul></nav>"#,
    );
    let nav = query(&container, "nav");
    let panel = query(&container, "[data-menu-panel]");
    let trigger = as_html(&query(&container, "[data-menu-trigger]"));

    let mut dropdown = DropdownNav::new(nav);
    dropdown.attach().unwrap();
    assert_eq!(panel.get_attribute("data-visible").as_deref(), Some("false"));

    trigger.click();
    let style = as_html(&panel).style();
    assert_eq!(style.get_property_value("display").unwrap(), "flex");

    // Placement and the visible flag land on the next animation frame.
    TimeoutFuture::new(150).await;
    assert_eq!(panel.get_attribute("data-visible").as_deref(), Some("true"));
    assert!(!style.get_property_value("left").unwrap().is_empty());

    document().body().unwrap().click();
    assert_eq!(panel.get_attribute("data-visible").as_deref(), Some("false"));

    // The panel is hidden for real once the exit transition ends.
    TimeoutFuture::new(300).await;
    assert!(style.get_property_value("display").unwrap().is_empty());

    dropdown.detach();
    container.remove();
}

#[wasm_bindgen_test]
fn test_widget_set_discovers_and_rebuilds() {
    let container = mount(
        r#"<nav><ul><li>
        <button data-menu-trigger="shop">Shop</button>
        <div data-menu-panel="shop"></div>
        </li></ul></nav>
        <button data-search-trigger>Search</button>
        <section data-search><form><input type="search" name="q"></form></section>
        <div data-search-results></div>
        <button data-panel-trigger="cart">Cart</button>
        <aside data-panel="cart"></aside>
        <div data-quantity>
        <button data-quantity-decrease>-</button>
        <input name="quantity" value="1">
        <button data-quantity-increase>+</button>
        </div>
        <main><section>one</section><section data-reveal-skip>two</section></main>"#,
    );
    let document = document();

    let widgets = discover(&document);
    assert_eq!(widgets.len(), 5);

    let mut set = WidgetSet::new();
    set.rebuild(&document);
    assert_eq!(set.len(), 5);

    // Rebuilding after a swap discovers the same markup again.
    set.rebuild(&document);
    assert_eq!(set.len(), 5);

    // Sections above the fold are revealed immediately.
    let section = query(&container, "main section");
    assert!(section.class_list().contains("visible"));

    set.detach_all();
    assert!(set.is_empty());

    container.remove();
}

// === History tests ===

#[wasm_bindgen_test]
fn test_current_path_is_rooted() {
    let window = web_sys::window().unwrap();
    let path = history::current_path_and_query(&window).unwrap();
    assert!(path.starts_with('/'));
}

#[wasm_bindgen_test]
fn test_push_of_current_path_adds_no_entry() {
    let window = web_sys::window().unwrap();
    let path = history::current_path_and_query(&window).unwrap();
    let before = window.history().unwrap().length().unwrap();

    history::push_or_replace(&window, &path, false).unwrap();
    assert_eq!(window.history().unwrap().length().unwrap(), before);

    // Replacing with the same path keeps the entry count and the URL.
    history::push_or_replace(&window, &path, true).unwrap();
    assert_eq!(window.history().unwrap().length().unwrap(), before);
    assert_eq!(history::current_path_and_query(&window).unwrap(), path);
}
