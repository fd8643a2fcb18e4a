//! Whitespace clean-up of converted HTML.
//!
//! `<pre>` blocks are swapped out for comment placeholders before the markup
//! is parsed, so code keeps its exact whitespace and escaping. The rest of the
//! tree loses whitespace-only text, collapses repeated whitespace and drops
//! empty paragraphs, then the protected blocks are put back in order.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use ego_tree::{NodeId, NodeRef, Tree};
use regex::Regex;
use scraper::{Html, Node};

use crate::config::RenderConfig;
use crate::error::ParseError;

static PRE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre\b[^>]*>.*?</pre\s*>").unwrap());

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static PLACEHOLDER_NONCE: AtomicU64 = AtomicU64::new(0);

/// Comment text that marks a lifted `<pre>` block.
const PLACEHOLDER_PREFIX: &str = "mdpanel-pre:";

/// Void elements left exactly as parsed.
const PRESERVED_ELEMENTS: &[&str] = &["hr", "br"];

#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    strict: bool,
}

/// `<pre>` blocks lifted out of the markup, keyed by their placeholder.
struct ProtectedBlocks<'h> {
    masked: String,
    blocks: Vec<(String, &'h str)>,
}

impl PostProcessor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            strict: config.strict_parse,
        }
    }

    /// Fail on any diagnostic the html parser reports.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn process(&self, html: &str) -> Result<String, ParseError> {
        let protected = protect_pre_blocks(html);

        let mut document = Html::parse_fragment(&protected.masked);
        if !document.errors.is_empty() {
            tracing::debug!(
                count = document.errors.len(),
                first = %document.errors[0],
                "html parser recovered from malformed markup"
            );
            if self.strict {
                return Err(ParseError::Structure {
                    count: document.errors.len(),
                    first: document.errors[0].to_string(),
                });
            }
        }

        let root = document.root_element().id();
        clean_children(&mut document.tree, root);
        let cleaned = document.root_element().inner_html();

        restore_pre_blocks(cleaned, &protected.blocks)
    }
}

fn protect_pre_blocks(html: &str) -> ProtectedBlocks<'_> {
    let nonce = PLACEHOLDER_NONCE.fetch_add(1, Ordering::Relaxed);
    let mut masked = String::with_capacity(html.len());
    let mut blocks = Vec::new();
    let mut last = 0;
    for found in PRE_BLOCK_RE.find_iter(html) {
        let token = format!("<!--{PLACEHOLDER_PREFIX}{nonce}:{}-->", blocks.len());
        masked.push_str(&html[last..found.start()]);
        masked.push_str(&token);
        blocks.push((token, found.as_str()));
        last = found.end();
    }
    masked.push_str(&html[last..]);
    ProtectedBlocks { masked, blocks }
}

fn restore_pre_blocks(mut html: String, blocks: &[(String, &str)]) -> Result<String, ParseError> {
    for (index, (token, block)) in blocks.iter().enumerate() {
        if html.matches(token.as_str()).count() != 1 {
            return Err(ParseError::Placeholder { index });
        }
        html = html.replacen(token.as_str(), block, 1);
    }
    Ok(html)
}

/// What to do with a node once its siblings to the right have been handled.
enum Visit {
    Keep,
    Detach,
    Replace(String),
    Descend,
}

fn clean_children(tree: &mut Tree<Node>, id: NodeId) {
    let children: Vec<NodeId> = match tree.get(id) {
        Some(node) => node.children().map(|child| child.id()).collect(),
        None => return,
    };

    for child in children.into_iter().rev() {
        let visit = match tree.get(child).map(|node| node.value()) {
            Some(Node::Text(text)) => {
                if text.trim().is_empty() {
                    Visit::Detach
                } else if WHITESPACE_RUN_RE.is_match(text) {
                    Visit::Replace(WHITESPACE_RUN_RE.replace_all(text, " ").into_owned())
                } else {
                    Visit::Keep
                }
            }
            Some(Node::Element(element)) if PRESERVED_ELEMENTS.contains(&element.name()) => {
                Visit::Keep
            }
            Some(Node::Element(_)) => Visit::Descend,
            _ => Visit::Keep,
        };

        match visit {
            Visit::Keep => {}
            Visit::Detach => detach(tree, child),
            Visit::Replace(collapsed) => {
                if let Some(mut node) = tree.get_mut(child) {
                    if let Node::Text(text) = node.value() {
                        text.text = collapsed.into();
                    }
                }
            }
            Visit::Descend => {
                clean_children(tree, child);
                if tree.get(child).is_some_and(is_empty_paragraph) {
                    detach(tree, child);
                }
            }
        }
    }
}

fn detach(tree: &mut Tree<Node>, id: NodeId) {
    if let Some(mut node) = tree.get_mut(id) {
        node.detach();
    }
}

/// A `<p>` with no visible text, no image, no line break and no lifted
/// code block.
fn is_empty_paragraph(node: NodeRef<'_, Node>) -> bool {
    let Node::Element(element) = node.value() else {
        return false;
    };
    if element.name() != "p" {
        return false;
    }
    for descendant in node.descendants().skip(1) {
        match descendant.value() {
            Node::Element(inner) if matches!(inner.name(), "img" | "br") => return false,
            Node::Text(text) if !text.trim().is_empty() => return false,
            Node::Comment(comment) if comment.comment.starts_with(PLACEHOLDER_PREFIX) => {
                return false;
            }
            _ => {}
        }
    }
    true
}
