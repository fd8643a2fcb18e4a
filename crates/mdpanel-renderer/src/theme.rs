use smol_str::SmolStr;

/// Visual parameters for the panel stylesheet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Theme {
    pub colors: ColorScheme,
    pub fonts: FontScheme,
    pub spacing: SpacingScheme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub background: SmolStr,
    pub foreground: SmolStr,
    pub muted: SmolStr,
    pub border: SmolStr,
    pub link: SmolStr,
    pub link_hover: SmolStr,
    /// Background behind inline code and code blocks.
    pub code_background: SmolStr,
    pub label_background: SmolStr,
    pub label_foreground: SmolStr,
    pub error: SmolStr,
    pub scrollbar: SmolStr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontScheme {
    pub body: SmolStr,
    pub monospace: SmolStr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpacingScheme {
    pub base_font_size: SmolStr,
    pub line_height: SmolStr,
    /// Vertical gap between block elements.
    pub block_gap: SmolStr,
    pub padding: SmolStr,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: SmolStr::new("transparent"),
            foreground: SmolStr::new("#24292f"),
            muted: SmolStr::new("#57606a"),
            border: SmolStr::new("#d0d7de"),
            link: SmolStr::new("#0969da"),
            link_hover: SmolStr::new("#0550ae"),
            code_background: SmolStr::new("#f6f8fa"),
            label_background: SmolStr::new("rgba(175, 184, 193, 0.3)"),
            label_foreground: SmolStr::new("#57606a"),
            error: SmolStr::new("#cf222e"),
            scrollbar: SmolStr::new("rgba(140, 149, 159, 0.5)"),
        }
    }
}

impl Default for FontScheme {
    fn default() -> Self {
        Self {
            body: SmolStr::new(
                "system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif",
            ),
            monospace: SmolStr::new(
                "ui-monospace, 'Cascadia Code', 'Roboto Mono', Consolas, monospace",
            ),
        }
    }
}

impl Default for SpacingScheme {
    fn default() -> Self {
        Self {
            base_font_size: SmolStr::new("14px"),
            line_height: SmolStr::new("1.5"),
            block_gap: SmolStr::new("0.75em"),
            padding: SmolStr::new("0.5rem"),
        }
    }
}
