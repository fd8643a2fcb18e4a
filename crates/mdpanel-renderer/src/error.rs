use miette::Diagnostic;
use thiserror::Error;

/// Syntax highlighting failed for a language syntect recognised.
///
/// Never escapes the converter: the code block falls back to plain text.
#[derive(Debug, Error, Diagnostic)]
pub enum HighlightError {
    #[error("failed to highlight {lang} code: {message}")]
    #[diagnostic(code(mdpanel::highlight::syntect))]
    Syntect { lang: String, message: String },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("html parser reported {count} structural error(s): {first}")]
    #[diagnostic(
        code(mdpanel::postprocess::structure),
        help("disable strict parsing to let the parser recover")
    )]
    Structure { count: usize, first: String },

    #[error("protected code block {index} did not survive the html round trip")]
    #[diagnostic(code(mdpanel::postprocess::placeholder))]
    Placeholder { index: usize },
}

/// Catch-all for a failed render cycle.
#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("markdown conversion failed")]
    #[diagnostic(code(mdpanel::convert))]
    Convert(#[from] std::fmt::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}
