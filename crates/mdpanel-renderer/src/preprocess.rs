use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// A line break followed by two or more whitespace-only lines.
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[^\S\n]*\n){2,}").unwrap());

/// Collapse every run of two or more blank lines into a single blank line.
///
/// Lines holding only whitespace count as blank. Text without such runs is
/// returned borrowed.
pub fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
    BLANK_RUN_RE.replace_all(text, "\n\n")
}
