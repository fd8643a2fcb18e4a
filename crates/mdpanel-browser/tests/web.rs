//! WASM browser tests for mdpanel-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use mdpanel_browser::mdpanel_renderer::annotate::{CODE_LABEL_CLASS, CODE_WRAPPER_CLASS};
use mdpanel_browser::mdpanel_renderer::{RenderConfig, RenderState};
use mdpanel_browser::{MarkdownPanel, annotate_container};
use web_sys::Element;

fn container() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn count(container: &Element, selector: &str) -> u32 {
    container.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
fn mount_renders_synchronously() {
    let panel = MarkdownPanel::mount(container(), RenderConfig::default(), "Hello *world*");
    assert_eq!(panel.container().inner_html(), "<p>Hello <em>world</em></p>");
    assert!(panel.container().class_list().contains("markdown-panel"));
}

#[wasm_bindgen_test]
fn blank_content_clears_immediately() {
    let panel = MarkdownPanel::mount(container(), RenderConfig::default(), "text");
    panel.set_content("  ", false);
    assert_eq!(panel.container().inner_html(), "");
}

#[wasm_bindgen_test]
fn changes_wait_for_the_debounce() {
    let panel = MarkdownPanel::mount(container(), RenderConfig::default(), "first");
    panel.set_content("second", true);
    assert_eq!(panel.container().inner_html(), "<p>first</p>");
    assert_eq!(panel.state(), RenderState::Scheduled);
    panel.render_now();
    assert_eq!(panel.container().inner_html(), "<p>second</p>");
}

#[wasm_bindgen_test]
fn labels_are_added_once() {
    let root = container();
    root.set_inner_html(
        "<pre><code class=\"language-rust\">fn main() {}</code></pre><pre><code>plain</code></pre>",
    );

    let first = annotate_container(&root);
    assert_eq!(first.wrapped, 1);
    assert_eq!(first.skipped, 1);

    let second = annotate_container(&root);
    assert_eq!(second.wrapped, 0);
    assert_eq!(second.relabelled, 1);

    assert_eq!(count(&root, &format!(".{CODE_WRAPPER_CLASS}")), 1);
    assert_eq!(count(&root, &format!(".{CODE_LABEL_CLASS}")), 1);
    let label = root
        .query_selector(&format!(".{CODE_LABEL_CLASS}"))
        .unwrap()
        .unwrap();
    assert_eq!(label.text_content().as_deref(), Some("rust"));
}

#[wasm_bindgen_test]
fn parse_failure_shows_inline_error() {
    let config = RenderConfig {
        strict_parse: true,
        ..Default::default()
    };
    let panel = MarkdownPanel::mount(container(), config, "text\n\n</div>");
    assert!(panel.error().is_some());
    assert!(
        panel
            .container()
            .inner_html()
            .starts_with("<div class=\"markdown-error\">")
    );
}
