use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use mdpanel_renderer::{Panel, RenderConfig, RenderState, Schedule};
use web_sys::Element;

use crate::surface::ElementSurface;

struct Inner {
    panel: Panel<ElementSurface>,
    /// The one armed debounce timer. Replacing or dropping it cancels it.
    timer: Option<Timeout>,
}

/// A markdown panel bound to a container element.
///
/// Cloning shares the panel. Timers only hold a weak reference, so dropping
/// the last handle cancels any pending render.
#[derive(Clone)]
pub struct MarkdownPanel {
    inner: Rc<RefCell<Inner>>,
}

impl MarkdownPanel {
    /// Bind to `container` and render `content` straight away.
    pub fn mount(container: Element, config: RenderConfig, content: impl Into<String>) -> Self {
        let panel = Panel::new(config, ElementSurface::new(container)).with_content(content);
        let this = Self {
            inner: Rc::new(RefCell::new(Inner { panel, timer: None })),
        };
        this.inner.borrow_mut().panel.mount();
        this
    }

    pub fn set_content(&self, content: impl Into<String>, streaming: bool) {
        let mut inner = self.inner.borrow_mut();
        match inner.panel.set_content(content, streaming) {
            Some(schedule) => inner.timer = Some(self.arm(schedule)),
            None => inner.timer = None,
        }
    }

    pub fn set_streaming(&self, streaming: bool) {
        self.inner.borrow_mut().panel.set_streaming(streaming);
    }

    /// Render now, skipping any pending debounce.
    pub fn render_now(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.timer = None;
        inner.panel.cancel_pending();
        inner.panel.render_now();
    }

    pub fn error(&self) -> Option<String> {
        self.inner.borrow().panel.error().map(str::to_string)
    }

    pub fn state(&self) -> RenderState {
        self.inner.borrow().panel.state()
    }

    pub fn container(&self) -> Element {
        self.inner.borrow().panel.surface().container().clone()
    }

    /// Cancel the pending render and empty the container.
    pub fn unmount(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.timer = None;
        inner.panel.cancel_pending();
        inner.panel.surface().container().set_inner_html("");
    }

    fn arm(&self, schedule: Schedule) -> Timeout {
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let millis = u32::try_from(schedule.delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // The fired timeout stays in the slot until the next arm replaces it.
            let Ok(mut inner) = inner.try_borrow_mut() else {
                tracing::warn!("panel busy when render timer fired");
                return;
            };
            inner.panel.fire(schedule.ticket);
        })
    }
}
