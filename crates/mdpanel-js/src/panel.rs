use mdpanel_browser::MarkdownPanel;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::parse_config;

/// A live markdown panel bound to a container element.
///
/// Renders the initial content on construction. Call `free()` when done;
/// that cancels any pending render.
#[wasm_bindgen(js_name = MarkdownPanel)]
pub struct JsMarkdownPanel {
    inner: MarkdownPanel,
}

#[wasm_bindgen(js_class = MarkdownPanel)]
impl JsMarkdownPanel {
    /// # Arguments
    /// * `container` - Element the panel renders into
    /// * `content` - Initial markdown, may be empty
    /// * `config` - Optional config object (`streamingDebounceMs`,
    ///   `idleDebounceMs`, `codeTheme`, `strictParse`)
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Element,
        content: Option<String>,
        config: Option<JsValue>,
    ) -> Result<JsMarkdownPanel, JsError> {
        let config = parse_config(config)?;
        Ok(Self {
            inner: MarkdownPanel::mount(container, config, content.unwrap_or_default()),
        })
    }

    /// Replace the content. Blank content clears the panel at once,
    /// anything else renders after the debounce.
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&self, content: String, streaming: Option<bool>) {
        self.inner.set_content(content, streaming.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = setStreaming)]
    pub fn set_streaming(&self, streaming: bool) {
        self.inner.set_streaming(streaming);
    }

    #[wasm_bindgen(js_name = renderNow)]
    pub fn render_now(&self) {
        self.inner.render_now();
    }

    /// Message of the last failed render, if the panel is showing an error.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.error()
    }

    pub fn unmount(&self) {
        self.inner.unmount();
    }
}
