use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::time::Duration;

/// Construction parameters for a panel renderer.
///
/// Deserializes from partial input; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Debounce applied while content is streaming in token by token.
    pub streaming_debounce_ms: u32,
    /// Debounce applied to ordinary edits.
    pub idle_debounce_ms: u32,
    /// Name of a syntect default theme used for inline code styles.
    pub code_theme: SmolStr,
    /// Fail post-processing on any diagnostic the html parser reports,
    /// instead of letting it recover.
    pub strict_parse: bool,
}

impl RenderConfig {
    pub fn streaming_debounce(&self) -> Duration {
        Duration::from_millis(self.streaming_debounce_ms.into())
    }

    pub fn idle_debounce(&self) -> Duration {
        Duration::from_millis(self.idle_debounce_ms.into())
    }

    /// Debounce to use for the next change.
    pub fn debounce_for(&self, streaming: bool) -> Duration {
        if streaming {
            self.streaming_debounce()
        } else {
            self.idle_debounce()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            streaming_debounce_ms: 5,
            idle_debounce_ms: 10,
            code_theme: SmolStr::new("InspiredGitHub"),
            strict_parse: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"streamingDebounceMs": 2, "strictParse": true}"#).unwrap();
        assert_eq!(config.streaming_debounce_ms, 2);
        assert!(config.strict_parse);
        assert_eq!(config.idle_debounce_ms, 10);
        assert_eq!(config.code_theme, "InspiredGitHub");
    }

    #[test]
    fn streaming_uses_shorter_delay() {
        let config = RenderConfig::default();
        assert_eq!(config.debounce_for(true), Duration::from_millis(5));
        assert_eq!(config.debounce_for(false), Duration::from_millis(10));
    }
}
