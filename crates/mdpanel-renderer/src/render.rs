use std::sync::OnceLock;

use crate::config::RenderConfig;
use crate::convert::Converter;
use crate::error::RenderError;
use crate::perf::measure;
use crate::postprocess::PostProcessor;
use crate::preprocess::collapse_blank_lines;
use crate::sanitize::Sanitizer;

/// The full text to safe HTML pipeline for one panel.
///
/// The converter and sanitizer are built on first use from the config given
/// at construction and are never shared between renderers.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    converter: OnceLock<Converter>,
    sanitizer: OnceLock<Sanitizer>,
    postprocessor: PostProcessor,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let postprocessor = PostProcessor::new(&config);
        Self {
            config,
            converter: OnceLock::new(),
            sanitizer: OnceLock::new(),
            postprocessor,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn converter(&self) -> &Converter {
        self.converter.get_or_init(|| Converter::new(&self.config))
    }

    fn sanitizer(&self) -> &Sanitizer {
        self.sanitizer.get_or_init(Sanitizer::new)
    }

    /// Run markup produced outside the pipeline through the same sanitizer.
    pub fn sanitize(&self, html: &str) -> String {
        self.sanitizer().clean(html)
    }

    /// Preprocess, convert, clean up and sanitize `text`.
    ///
    /// The result is a complete HTML string, ready to replace a container's
    /// content in one write.
    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        let _span = tracing::debug_span!("render", len = text.len()).entered();

        let text = measure("preprocess", || collapse_blank_lines(text));
        let html = measure("convert", || self.converter().to_html(&text))?;
        let html = measure("postprocess", || self.postprocessor.process(&html))?;
        let html = measure("sanitize", || self.sanitizer().clean(&html));

        tracing::debug!(bytes = html.len(), "rendered markdown");
        Ok(html)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// One-shot render with a throwaway renderer.
pub fn render_markdown(text: &str, config: &RenderConfig) -> Result<String, RenderError> {
    Renderer::new(config.clone()).render(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn smoke() {
        let html = Renderer::default().render("Hello *world*").unwrap();
        assert_eq!(html, "<p>Hello <em>world</em></p>");
    }

    #[test]
    fn same_text_renders_identically() {
        let renderer = Renderer::default();
        let text = "# Title\n\nSome `code` and a [link](https://example.com).\n\n```rust\nfn main() {}\n```\n";
        let first = renderer.render(text).unwrap();
        let second = renderer.render(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn separate_renderers_agree() {
        let text = "- one\n- two\n\n> quote";
        let a = Renderer::default().render(text).unwrap();
        let b = render_markdown(text, &RenderConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn script_tags_never_survive() {
        let html = Renderer::default()
            .render("hello\n\n<script>alert(1)</script>\n\nbye")
            .unwrap();
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
    }

    #[test]
    fn strict_parse_failure_is_an_error() {
        let renderer = Renderer::new(RenderConfig {
            strict_parse: true,
            ..Default::default()
        });
        let err = renderer.render("text\n\n</div>").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }
}
