//! Markdown panel renderer
//!
//! Turns Markdown text into sanitized HTML for a UI panel whose content may
//! arrive all at once or token by token. The pipeline is preprocess, convert,
//! post-process and sanitize; [`panel::Panel`] drives it from content changes
//! through a debounced [`scheduler::RenderScheduler`].
//!
//! Nothing here touches a DOM. Hosts implement [`panel::Surface`] and
//! [`annotate::CodeBlockHost`] for their container.

pub mod annotate;
pub mod config;
pub mod convert;
pub mod error;
pub mod highlight;
pub mod panel;
pub mod perf;
pub mod postprocess;
pub mod preprocess;
pub mod render;
pub mod sanitize;
pub mod scheduler;
pub mod stylesheet;
pub mod theme;

mod writer;

pub use annotate::{AnnotateStats, CodeBlockHost, annotate_code_blocks};
pub use config::RenderConfig;
pub use error::{HighlightError, ParseError, RenderError};
pub use panel::{Panel, Surface};
pub use render::{Renderer, render_markdown};
pub use scheduler::{RenderScheduler, RenderState, Schedule, Ticket, Trigger};
pub use stylesheet::generate_panel_css;
pub use theme::Theme;
