use std::cell::Cell;
use std::rc::Rc;

use mdpanel_renderer::Surface;
use mdpanel_renderer::stylesheet::PANEL_CLASS;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::annotate::annotate_container;

/// Writes panel output into a container element.
///
/// Code labels are added on the next animation frame, once the browser has
/// laid out the new content. Requests made before that frame share it.
pub struct ElementSurface {
    container: Element,
    annotation_queued: Rc<Cell<bool>>,
}

impl ElementSurface {
    pub fn new(container: Element) -> Self {
        if let Err(e) = container.class_list().add_1(PANEL_CLASS) {
            tracing::warn!(error = ?e, "failed to tag panel container");
        }
        Self {
            container,
            annotation_queued: Rc::new(Cell::new(false)),
        }
    }

    pub fn container(&self) -> &Element {
        &self.container
    }
}

impl Surface for ElementSurface {
    fn replace_html(&mut self, html: &str) {
        self.container.set_inner_html(html);
    }

    fn clear(&mut self) {
        self.container.set_inner_html("");
    }

    fn request_annotation(&mut self) {
        if self.annotation_queued.replace(true) {
            return;
        }
        let Some(window) = web_sys::window() else {
            self.annotation_queued.set(false);
            annotate_container(&self.container);
            return;
        };

        let container = self.container.clone();
        let queued = self.annotation_queued.clone();
        let closure = Closure::once(move || {
            queued.set(false);
            annotate_container(&container);
        });

        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            tracing::warn!(error = ?e, "requestAnimationFrame failed, labelling now");
            self.annotation_queued.set(false);
            annotate_container(&self.container);
            return;
        }
        closure.forget();
    }
}
