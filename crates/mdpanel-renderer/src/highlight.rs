//! Inline-styled syntax highlighting for fenced code blocks.
//!
//! Token markup is emitted as `<span style="...">` runs so the output needs no
//! companion stylesheet. Syntax definitions and themes are loaded once per
//! process and never mutated; each [`CodeHighlighter`] owns its chosen theme.

use crate::error::HighlightError;

#[cfg(feature = "syntax-highlighting")]
use std::sync::LazyLock;
#[cfg(feature = "syntax-highlighting")]
use syntect::easy::HighlightLines;
#[cfg(feature = "syntax-highlighting")]
use syntect::highlighting::{Theme, ThemeSet};
#[cfg(feature = "syntax-highlighting")]
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
#[cfg(feature = "syntax-highlighting")]
use syntect::parsing::SyntaxSet;
#[cfg(feature = "syntax-highlighting")]
use syntect::util::LinesWithEndings;

#[cfg(feature = "syntax-highlighting")]
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
#[cfg(feature = "syntax-highlighting")]
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[cfg(feature = "syntax-highlighting")]
const FALLBACK_THEME: &str = "InspiredGitHub";

#[derive(Debug, Clone)]
pub struct CodeHighlighter {
    #[cfg(feature = "syntax-highlighting")]
    theme: Theme,
}

impl CodeHighlighter {
    /// Build a highlighter for one of syntect's default themes.
    ///
    /// Unknown names fall back to `InspiredGitHub`.
    #[cfg(feature = "syntax-highlighting")]
    pub fn new(theme_name: &str) -> Self {
        let theme = match THEME_SET.themes.get(theme_name) {
            Some(theme) => theme.clone(),
            None => {
                tracing::warn!(theme = theme_name, "unknown code theme, using {FALLBACK_THEME}");
                THEME_SET
                    .themes
                    .get(FALLBACK_THEME)
                    .cloned()
                    .unwrap_or_default()
            }
        };
        Self { theme }
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    pub fn new(_theme_name: &str) -> Self {
        Self {}
    }

    /// Whether `lang` names a syntax we can highlight.
    #[cfg(feature = "syntax-highlighting")]
    pub fn supports(&self, lang: &str) -> bool {
        SYNTAX_SET.find_syntax_by_token(lang).is_some()
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    pub fn supports(&self, _lang: &str) -> bool {
        false
    }

    /// Highlight `code` as `lang`.
    ///
    /// Returns `Ok(None)` when the language is not recognised; the caller
    /// should emit the code unmodified.
    #[cfg(feature = "syntax-highlighting")]
    pub fn highlight(&self, lang: &str, code: &str) -> Result<Option<String>, HighlightError> {
        let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang) else {
            return Ok(None);
        };
        let fail = |e: syntect::Error| HighlightError::Syntect {
            lang: lang.to_string(),
            message: e.to_string(),
        };

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut output = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &SYNTAX_SET).map_err(fail)?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(fail)?;
            output.push_str(&html);
        }
        Ok(Some(output))
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    pub fn highlight(&self, _lang: &str, _code: &str) -> Result<Option<String>, HighlightError> {
        Ok(None)
    }
}

impl Default for CodeHighlighter {
    #[cfg(feature = "syntax-highlighting")]
    fn default() -> Self {
        Self::new(FALLBACK_THEME)
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(all(test, feature = "syntax-highlighting"))]
mod tests {
    use super::*;

    #[test]
    fn known_language_gets_inline_styles() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter
            .highlight("rust", "fn main() {}\n")
            .unwrap()
            .expect("rust is a default syntax");
        assert!(html.contains("<span style=\""));
        assert!(html.contains("main"));
    }

    #[test]
    fn unknown_language_is_not_highlighted() {
        let highlighter = CodeHighlighter::default();
        assert!(!highlighter.supports("definitely-not-a-language"));
        assert!(
            highlighter
                .highlight("definitely-not-a-language", "x")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn markup_in_code_is_escaped() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter.highlight("rust", "let a = \"<div>\";\n").unwrap().unwrap();
        assert!(html.contains("&lt;div&gt;"));
        assert!(!html.contains("<div>"));
    }

    #[test]
    fn unknown_theme_falls_back() {
        let highlighter = CodeHighlighter::new("no-such-theme");
        assert!(highlighter.highlight("rust", "let x = 1;\n").unwrap().is_some());
    }
}
