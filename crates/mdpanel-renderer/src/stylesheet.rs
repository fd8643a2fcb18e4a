//! The panel's fixed stylesheet.
//!
//! Everything is scoped under [`PANEL_CLASS`] so the panel can sit inside any
//! host page. Code blocks carry inline syntect styles, so only the frame
//! around them is styled here.

use crate::annotate::{CODE_LABEL_CLASS, CODE_WRAPPER_CLASS};
use crate::theme::Theme;

/// Class the host puts on the panel container.
pub const PANEL_CLASS: &str = "markdown-panel";

pub fn generate_panel_css(theme: &Theme) -> String {
    let colors = &theme.colors;
    let fonts = &theme.fonts;
    let spacing = &theme.spacing;

    format!(
        r#"/* Container */
.{panel} {{
    --md-background: {background};
    --md-foreground: {foreground};
    --md-muted: {muted};
    --md-border: {border};
    --md-link: {link};
    --md-link-hover: {link_hover};
    --md-code-background: {code_background};
    --md-label-background: {label_background};
    --md-label-foreground: {label_foreground};
    --md-error: {error};
    --md-scrollbar: {scrollbar};
    --md-gap: {gap};

    font-family: {body};
    font-size: {font_size};
    line-height: {line_height};
    color: var(--md-foreground);
    background: var(--md-background);
    padding: {padding};
    overflow-wrap: anywhere;
    overflow-y: auto;
}}

.{panel} > :first-child {{ margin-top: 0; }}
.{panel} > :last-child {{ margin-bottom: 0; }}

/* Block spacing */
.{panel} p,
.{panel} ul,
.{panel} ol,
.{panel} blockquote,
.{panel} table,
.{panel} pre,
.{panel} .{wrapper} {{
    margin: 0 0 var(--md-gap) 0;
}}

.{panel} h1, .{panel} h2, .{panel} h3,
.{panel} h4, .{panel} h5, .{panel} h6 {{
    margin: calc(var(--md-gap) * 1.5) 0 var(--md-gap) 0;
    line-height: 1.25;
}}

.{panel} h1 {{ font-size: 1.5em; }}
.{panel} h2 {{ font-size: 1.3em; }}
.{panel} h3 {{ font-size: 1.15em; }}
.{panel} h4, .{panel} h5, .{panel} h6 {{ font-size: 1em; }}

.{panel} ul, .{panel} ol {{
    padding-left: 1.5em;
}}

.{panel} li + li {{
    margin-top: 0.25em;
}}

.{panel} li > input[type="checkbox"] {{
    margin-right: 0.4em;
}}

.{panel} blockquote {{
    padding-left: 0.75em;
    border-left: 3px solid var(--md-border);
    color: var(--md-muted);
}}

.{panel} hr {{
    border: none;
    border-top: 1px solid var(--md-border);
    margin: var(--md-gap) 0;
}}

.{panel} img {{
    max-width: 100%;
}}

.{panel} a {{
    color: var(--md-link);
    text-decoration: none;
}}

.{panel} a:hover {{
    color: var(--md-link-hover);
    text-decoration: underline;
}}

/* Tables */
.{panel} table {{
    display: block;
    max-width: 100%;
    overflow-x: auto;
    border-collapse: collapse;
}}

.{panel} th,
.{panel} td {{
    padding: 0.3em 0.6em;
    border: 1px solid var(--md-border);
}}

.{panel} th {{
    font-weight: 600;
    background: var(--md-code-background);
}}

/* Code */
.{panel} code {{
    font-family: {monospace};
    font-size: 0.9em;
    background: var(--md-code-background);
    padding: 0.1em 0.3em;
    border-radius: 4px;
}}

.{panel} pre {{
    overflow-x: auto;
    padding: 0.75em 1em;
    background: var(--md-code-background);
    border: 1px solid var(--md-border);
    border-radius: 6px;
}}

.{panel} pre code {{
    padding: 0;
    background: none;
    font-size: 0.85em;
    white-space: pre;
}}

/* Language labels */
.{panel} .{wrapper} {{
    position: relative;
}}

.{panel} .{wrapper} > pre {{
    margin: 0;
}}

.{panel} .{label} {{
    position: absolute;
    top: 0;
    right: 0;
    padding: 0.1em 0.5em;
    font-family: {monospace};
    font-size: 0.75em;
    color: var(--md-label-foreground);
    background: var(--md-label-background);
    border-bottom-left-radius: 6px;
    border-top-right-radius: 6px;
    pointer-events: none;
    user-select: none;
}}

/* Scrollbars */
.{panel}, .{panel} pre, .{panel} table {{
    scrollbar-width: thin;
    scrollbar-color: var(--md-scrollbar) transparent;
}}

.{panel}::-webkit-scrollbar,
.{panel} pre::-webkit-scrollbar,
.{panel} table::-webkit-scrollbar {{
    width: 6px;
    height: 6px;
}}

.{panel}::-webkit-scrollbar-thumb,
.{panel} pre::-webkit-scrollbar-thumb,
.{panel} table::-webkit-scrollbar-thumb {{
    background: var(--md-scrollbar);
    border-radius: 3px;
}}

/* Render failures */
.{panel} .markdown-error {{
    color: var(--md-error);
    border: 1px solid var(--md-error);
    border-radius: 4px;
    padding: 0.5em 0.75em;
    font-family: {monospace};
    font-size: 0.85em;
    white-space: pre-wrap;
}}
"#,
        panel = PANEL_CLASS,
        wrapper = CODE_WRAPPER_CLASS,
        label = CODE_LABEL_CLASS,
        background = colors.background,
        foreground = colors.foreground,
        muted = colors.muted,
        border = colors.border,
        link = colors.link,
        link_hover = colors.link_hover,
        code_background = colors.code_background,
        label_background = colors.label_background,
        label_foreground = colors.label_foreground,
        error = colors.error,
        scrollbar = colors.scrollbar,
        gap = spacing.block_gap,
        body = fonts.body,
        monospace = fonts.monospace,
        font_size = spacing.base_font_size,
        line_height = spacing.line_height,
        padding = spacing.padding,
    )
}
