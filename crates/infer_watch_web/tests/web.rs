//! In-browser checks. Run with `wasm-pack test --headless --firefox -- --features web`.
#![cfg(all(feature = "web", target_arch = "wasm32"))]

use infer_watch::render::{MSG_AWAITING_ANALYSIS, MSG_ESTABLISHING, MSG_HISTORY_LOADING};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn add(doc: &web_sys::Document, tag: &str, id: &str) -> web_sys::Element {
    let el = doc.create_element(tag).unwrap();
    el.set_id(id);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn start_boots_page_into_connecting_state() {
    let doc = web_sys::window().unwrap().document().unwrap();
    add(&doc, "img", "camera-image");
    let predictions = add(&doc, "div", "prediction-results");
    let overlay = add(&doc, "div", "loading-overlay");
    overlay.set_class_name("hidden");
    let status = add(&doc, "p", "loading-status");
    let history = add(&doc, "div", "history-container");

    infer_watch_web::start();

    // Requests are still in flight here; only the boot state is visible.
    assert!(!overlay.class_list().contains("hidden"));
    assert_eq!(status.text_content().as_deref(), Some(MSG_ESTABLISHING));
    assert_eq!(
        predictions.text_content().as_deref(),
        Some(MSG_AWAITING_ANALYSIS)
    );
    assert_eq!(history.text_content().as_deref(), Some(MSG_HISTORY_LOADING));
    assert!(predictions
        .first_element_child()
        .is_some_and(|p| p.class_name() == "initial-message"));
}
