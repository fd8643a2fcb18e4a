//! Panel orchestration: content, scheduling, rendering and error state.
//!
//! [`Panel`] is platform independent. The host supplies a [`Surface`] to
//! write into and arms one timer per [`Schedule`] it is handed, calling
//! [`Panel::fire`] when that timer elapses.

use markdown_weaver_escape::{FmtWriter, escape_html};

use crate::config::RenderConfig;
use crate::render::Renderer;
use crate::scheduler::{RenderScheduler, RenderState, Schedule, Ticket, Trigger};

/// Where rendered HTML ends up.
pub trait Surface {
    /// Replace the whole content with `html`. Always sanitized markup.
    fn replace_html(&mut self, html: &str);

    fn clear(&mut self);

    /// Label code blocks once the new content has been painted.
    fn request_annotation(&mut self);
}

/// Inline markup shown in place of content when a render fails.
pub fn error_markup(message: &str) -> String {
    let mut html = String::from("<div class=\"markdown-error\">Error rendering markdown: ");
    let _ = escape_html(FmtWriter(&mut html), message);
    html.push_str("</div>");
    html
}

pub struct Panel<S> {
    renderer: Renderer,
    scheduler: RenderScheduler,
    surface: S,
    content: String,
    streaming: bool,
    error: Option<String>,
    renders: u64,
}

impl<S: Surface> Panel<S> {
    pub fn new(config: RenderConfig, surface: S) -> Self {
        let scheduler = RenderScheduler::new(&config);
        Self {
            renderer: Renderer::new(config),
            scheduler,
            surface,
            content: String::new(),
            streaming: false,
            error: None,
            renders: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }

    /// Message of the last failed render, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> RenderState {
        self.scheduler.state()
    }

    /// Completed render cycles, successful or not.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &RenderConfig {
        self.renderer.config()
    }

    /// Render the current content immediately, dropping any pending render.
    pub fn mount(&mut self) {
        match self.scheduler.on_mount() {
            Trigger::Now => self.render_now(),
            Trigger::After(_) => {}
        }
    }

    /// Only picks the debounce used for the next change.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Replace the content.
    ///
    /// Blank content clears the surface before returning. Otherwise the
    /// returned [`Schedule`] must be armed by the host, superseding any timer
    /// armed for an earlier change.
    pub fn set_content(&mut self, content: impl Into<String>, streaming: bool) -> Option<Schedule> {
        self.content = content.into();
        self.streaming = streaming;
        let blank = self.content.trim().is_empty();
        match self.scheduler.on_change(blank, streaming) {
            Trigger::Now => {
                self.render_now();
                None
            }
            Trigger::After(schedule) => Some(schedule),
        }
    }

    /// A timer armed for `ticket` elapsed. Returns whether a render ran.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.scheduler.fire(ticket) {
            self.render_now();
            true
        } else {
            false
        }
    }

    /// Drop the pending render without running it.
    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel();
    }

    /// Run one render cycle synchronously. Failures end up on the surface and
    /// in [`Panel::error`], never with the caller.
    pub fn render_now(&mut self) {
        self.scheduler.begin();

        let outcome = if self.content.trim().is_empty() {
            self.surface.clear();
            Ok(())
        } else {
            self.renderer.render(&self.content).map(|html| {
                self.surface.replace_html(&html);
                self.surface.request_annotation();
            })
        };

        match outcome {
            Ok(()) => {
                self.error = None;
                self.scheduler.finish(true);
            }
            Err(err) => {
                tracing::error!(error = %err, "markdown panel render failed");
                let message = err.to_string();
                let markup = self.renderer.sanitize(&error_markup(&message));
                self.surface.replace_html(&markup);
                self.error = Some(message);
                self.scheduler.finish(false);
            }
        }
        self.renders += 1;
    }
}
