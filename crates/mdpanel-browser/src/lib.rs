//! Browser DOM layer for the markdown panel.
//!
//! Binds [`mdpanel_renderer::Panel`] to a container element. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! - `surface`: container writes and animation-frame deferred labelling
//! - `annotate`: code-label wrappers over live `<pre>` elements
//! - `panel`: [`MarkdownPanel`], owning the debounce timer

pub use mdpanel_renderer;

pub mod annotate;
pub mod panel;
pub mod surface;

pub use annotate::{DomCodeBlocks, annotate_container};
pub use panel::MarkdownPanel;
pub use surface::ElementSurface;
