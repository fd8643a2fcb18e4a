//! Language labels for rendered code blocks.
//!
//! After rendered HTML lands in a container, each `<pre>` whose `<code>` child
//! carries a `language-*` class is wrapped in a [`CODE_WRAPPER_CLASS`] element
//! holding a small [`CODE_LABEL_CLASS`] label. The walk is written against
//! [`CodeBlockHost`] so the browser DOM and tests can share it.
//!
//! Running it again over the same container only refreshes label text; a
//! block is never wrapped twice.

use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

pub const CODE_WRAPPER_CLASS: &str = "code-block-wrapper";
pub const CODE_LABEL_CLASS: &str = "code-lang-label";

static LANGUAGE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)language-(\S+)").unwrap());

/// Extract the language from a `language-{lang}` class token.
pub fn language_from_class(class: &str) -> Option<&str> {
    LANGUAGE_CLASS_RE
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|lang| lang.as_str())
}

/// A container whose code blocks can be labelled.
pub trait CodeBlockHost {
    /// Handle to a `<pre>` element.
    type Block;
    /// Identity of a block within one annotation pass.
    type Key: Eq + Hash;

    /// `<pre>` elements that contain a `<code>` element, in document order.
    fn code_blocks(&self) -> Vec<Self::Block>;

    fn block_key(&self, block: &Self::Block) -> Self::Key;

    /// Class attribute of the block's `<code>` element.
    fn code_class(&self, block: &Self::Block) -> Option<String>;

    /// Whether the block already sits inside a label wrapper.
    fn is_wrapped(&self, block: &Self::Block) -> bool;

    /// Update the label of an already wrapped block.
    fn set_label(&mut self, block: &Self::Block, language: &str);

    /// Replace the block with a wrapper holding a label and a copy of the block.
    fn wrap(&mut self, block: &Self::Block, language: &str);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateStats {
    pub wrapped: usize,
    pub relabelled: usize,
    /// Blocks without a language class.
    pub skipped: usize,
}

/// Label every code block in `host`, touching each block at most once.
pub fn annotate_code_blocks<H: CodeBlockHost>(host: &mut H) -> AnnotateStats {
    let mut visited = HashSet::new();
    let mut stats = AnnotateStats::default();

    for block in host.code_blocks() {
        if !visited.insert(host.block_key(&block)) {
            continue;
        }
        let Some(class) = host.code_class(&block) else {
            stats.skipped += 1;
            continue;
        };
        let Some(language) = language_from_class(&class) else {
            stats.skipped += 1;
            continue;
        };

        if host.is_wrapped(&block) {
            host.set_label(&block, language);
            stats.relabelled += 1;
        } else {
            host.wrap(&block, language);
            stats.wrapped += 1;
        }
    }

    tracing::trace!(?stats, "annotated code blocks");
    stats
}
