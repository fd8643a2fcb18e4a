//! WASM bindings for the markdown panel.
//!
//! Exposes the live panel component and one-shot rendering to JS/TS apps via
//! wasm-bindgen.

use mdpanel_browser::mdpanel_renderer::{self, RenderConfig, Theme};
use serde::Deserialize;
use serde_wasm_bindgen::Deserializer;
use tracing::Level;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::prelude::*;

mod panel;

pub use panel::JsMarkdownPanel;

/// Install the panic hook and route `tracing` output to the console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let max_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build(),
    );
    let _ = tracing::subscriber::set_global_default(Registry::default().with(wasm_layer));
}

/// Read an optional plain JS config object; absent fields keep their defaults.
pub(crate) fn parse_config(config: Option<JsValue>) -> Result<RenderConfig, JsError> {
    match config {
        Some(value) if !value.is_undefined() && !value.is_null() => {
            RenderConfig::deserialize(Deserializer::from(value))
                .map_err(|e| JsError::new(&format!("Invalid panel config: {}", e)))
        }
        _ => Ok(RenderConfig::default()),
    }
}

/// Render markdown to sanitized HTML.
///
/// # Arguments
/// * `markdown` - The markdown source text
/// * `config` - Optional config object, e.g. `{ codeTheme: "base16-ocean.dark" }`
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(markdown: &str, config: Option<JsValue>) -> Result<String, JsError> {
    let config = parse_config(config)?;
    mdpanel_renderer::render_markdown(markdown, &config).map_err(|e| JsError::new(&e.to_string()))
}

/// The stylesheet panel containers expect, with the default theme.
#[wasm_bindgen(js_name = panelStylesheet)]
pub fn panel_stylesheet() -> String {
    mdpanel_renderer::generate_panel_css(&Theme::default())
}
