use markdown_weaver::{Options, Parser};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::highlight::CodeHighlighter;
use crate::writer::write_html_fmt;

/// Parser extensions used for panel content.
///
/// Smart punctuation provides typographic quotes and dashes. Raw HTML is
/// always passed through by the parser.
pub fn default_md_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Markdown to HTML conversion with highlighted code blocks.
#[derive(Debug, Clone)]
pub struct Converter {
    options: Options,
    highlighter: CodeHighlighter,
}

impl Converter {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            options: default_md_options(),
            highlighter: CodeHighlighter::new(&config.code_theme),
        }
    }

    pub fn highlighter(&self) -> &CodeHighlighter {
        &self.highlighter
    }

    pub fn to_html(&self, text: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(text, self.options);
        let mut html = String::with_capacity(text.len() * 3 / 2);
        write_html_fmt(&mut html, parser, &self.highlighter)?;
        Ok(html)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(text: &str) -> String {
        Converter::default().to_html(text).unwrap()
    }

    #[test]
    fn paragraphs() {
        assert_eq!(convert("Hello world"), "<p>Hello world</p>\n");
    }

    #[test]
    fn raw_html_passes_through() {
        let html = convert("before <kbd>Ctrl</kbd> after");
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn soft_breaks_stay_newlines() {
        let html = convert("line one\nline two");
        assert_eq!(html, "<p>line one\nline two</p>\n");
    }

    #[test]
    fn bare_urls_are_linked() {
        let html = convert("see https://example.com/docs.");
        assert_eq!(
            html,
            "<p>see <a href=\"https://example.com/docs\">https://example.com/docs</a>.</p>\n"
        );
    }

    #[test]
    fn www_urls_get_a_scheme() {
        let html = convert("visit www.example.com today");
        assert!(html.contains("<a href=\"http://www.example.com\">www.example.com</a>"));
    }

    #[test]
    fn explicit_links_are_not_double_linked() {
        let html = convert("[docs](https://example.com) and <https://example.org>");
        assert_eq!(html.matches("<a ").count(), 2);
    }

    #[test]
    fn raw_anchor_text_is_not_linked() {
        let html = convert("x <a href=\"https://example.com\">https://example.com</a> y https://example.org");
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains("<a href=\"https://example.org\">https://example.org</a>"));
    }

    #[test]
    fn raw_code_text_is_not_linked() {
        let html = convert("run <code>curl https://example.com</code> then <kbd>www.example.org</kbd>");
        assert_eq!(
            html,
            "<p>run <code>curl https://example.com</code> then <kbd>www.example.org</kbd></p>\n"
        );
    }

    #[test]
    fn typographic_substitution() {
        let html = convert("\"quoted\" -- dash");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{201d}'));
        assert!(html.contains('\u{2013}'));
    }

    #[test]
    fn unknown_language_passes_code_through() {
        let html = convert("```nosuchlang\n<div>  x</div>\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-nosuchlang\">&lt;div&gt;  x&lt;/div&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn untagged_fence_has_no_class() {
        let html = convert("```\nplain\n```");
        assert_eq!(html, "<pre><code>plain\n</code></pre>\n");
    }

    #[cfg(feature = "syntax-highlighting")]
    #[test]
    fn known_language_is_highlighted() {
        let html = convert("```rust\nfn main() {}\n```");
        assert!(html.starts_with("<pre><code class=\"language-rust\"><span style="));
        assert!(html.ends_with("</code></pre>\n"));
    }
}
