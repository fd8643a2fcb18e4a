//! KDL config files for the CLI.
//!
//! ```kdl
//! code-theme "base16-ocean.dark"
//! strict-parse true
//! streaming-debounce-ms 5
//! idle-debounce-ms 10
//! ```
//!
//! Every node is optional; unknown nodes are ignored with a warning.

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlNode};
use mdpanel_renderer::RenderConfig;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

const KNOWN_NODES: &[&str] = &[
    "code-theme",
    "strict-parse",
    "streaming-debounce-ms",
    "idle-debounce-ms",
];

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("couldn't read config file {}", path.display())]
    #[diagnostic(code(mdpanel::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid KDL in {}: {message}", path.display())]
    #[diagnostic(code(mdpanel::config::syntax))]
    Syntax { path: PathBuf, message: String },

    #[error("`{node}` in {} must be {expected}", path.display())]
    #[diagnostic(
        code(mdpanel::config::value),
        help("e.g. `strict-parse true` or `idle-debounce-ms 10`")
    )]
    Value {
        path: PathBuf,
        node: String,
        expected: &'static str,
    },
}

pub fn load(path: &Path) -> Result<RenderConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Parse config text, layering it over the defaults. `path` only labels errors.
pub fn parse(text: &str, path: &Path) -> Result<RenderConfig, ConfigError> {
    let doc: KdlDocument = text.parse().map_err(|e: kdl::KdlError| ConfigError::Syntax {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    for node in doc.nodes() {
        let name = node.name().value();
        if !KNOWN_NODES.contains(&name) {
            tracing::warn!(node = name, path = %path.display(), "ignoring unknown config node");
        }
    }

    let invalid = |node: &str, expected| ConfigError::Value {
        path: path.to_path_buf(),
        node: node.to_string(),
        expected,
    };

    let mut config = RenderConfig::default();
    if let Some(node) = doc.get("code-theme") {
        let theme = first_value(node)
            .and_then(|v| v.as_string())
            .ok_or_else(|| invalid("code-theme", "a string"))?;
        config.code_theme = SmolStr::new(theme);
    }
    if let Some(node) = doc.get("strict-parse") {
        config.strict_parse = first_value(node)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| invalid("strict-parse", "true or false"))?;
    }
    if let Some(node) = doc.get("streaming-debounce-ms") {
        config.streaming_debounce_ms = millis(node)
            .ok_or_else(|| invalid("streaming-debounce-ms", "a non-negative integer"))?;
    }
    if let Some(node) = doc.get("idle-debounce-ms") {
        config.idle_debounce_ms =
            millis(node).ok_or_else(|| invalid("idle-debounce-ms", "a non-negative integer"))?;
    }
    Ok(config)
}

fn first_value(node: &KdlNode) -> Option<&kdl::KdlValue> {
    node.entries().first().map(|entry| entry.value())
}

fn millis(node: &KdlNode) -> Option<u32> {
    first_value(node)
        .and_then(|v| v.as_i64())
        .and_then(|ms| u32::try_from(ms).ok())
}
