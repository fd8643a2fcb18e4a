//! Panel behaviour driven through a virtual clock.
//!
//! `Host` plays the part of the browser component: it keeps one armed timer,
//! replacing it on every schedule, and fires it when the clock passes its
//! deadline.

use std::time::Duration;

use mdpanel_renderer::annotate::{CODE_LABEL_CLASS, CODE_WRAPPER_CLASS};
use mdpanel_renderer::{Panel, RenderConfig, RenderState, Schedule, Surface, Ticket};

#[derive(Debug, Default)]
struct Container {
    html: Option<String>,
    writes: Vec<String>,
    annotation_requests: usize,
}

impl Surface for Container {
    fn replace_html(&mut self, html: &str) {
        self.html = Some(html.to_string());
        self.writes.push(html.to_string());
    }

    fn clear(&mut self) {
        self.html = None;
    }

    fn request_annotation(&mut self) {
        self.annotation_requests += 1;
    }
}

struct Host {
    panel: Panel<Container>,
    now: Duration,
    timer: Option<(Duration, Ticket)>,
}

impl Host {
    fn new(config: RenderConfig) -> Self {
        Self {
            panel: Panel::new(config, Container::default()),
            now: Duration::ZERO,
            timer: None,
        }
    }

    fn arm(&mut self, schedule: Option<Schedule>) {
        if let Some(schedule) = schedule {
            self.timer = Some((self.now + schedule.delay, schedule.ticket));
        }
    }

    fn set(&mut self, content: &str, streaming: bool) {
        let schedule = self.panel.set_content(content, streaming);
        self.arm(schedule);
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        if let Some((deadline, ticket)) = self.timer {
            if deadline <= self.now {
                self.timer = None;
                self.panel.fire(ticket);
            }
        }
    }

    fn html(&self) -> Option<&str> {
        self.panel.surface().html.as_deref()
    }
}

const MS: Duration = Duration::from_millis(1);

#[test]
fn streaming_tokens_coalesce_into_one_render() {
    let mut host = Host::new(RenderConfig::default());
    host.set("Hel", true);
    host.advance(MS * 2);
    host.set("Hello", true);
    host.advance(MS * 2);
    host.set("Hello **world**", true);

    assert_eq!(host.panel.render_count(), 0);
    host.advance(MS * 4);
    assert_eq!(host.panel.render_count(), 0);
    host.advance(MS);
    assert_eq!(host.panel.render_count(), 1);
    assert_eq!(host.html(), Some("<p>Hello <strong>world</strong></p>"));
}

#[test]
fn idle_edits_use_the_longer_delay() {
    let mut host = Host::new(RenderConfig::default());
    host.set("edit", false);
    host.advance(MS * 9);
    assert_eq!(host.panel.state(), RenderState::Scheduled);
    host.advance(MS);
    assert_eq!(host.html(), Some("<p>edit</p>"));
    assert_eq!(host.panel.state(), RenderState::Idle);
}

#[test]
fn configured_delays_are_honoured() {
    let mut host = Host::new(RenderConfig {
        streaming_debounce_ms: 50,
        ..Default::default()
    });
    host.set("slow", true);
    host.advance(MS * 49);
    assert_eq!(host.panel.render_count(), 0);
    host.advance(MS);
    assert_eq!(host.panel.render_count(), 1);
}

#[test]
fn stale_timer_cannot_render_old_content() {
    let mut host = Host::new(RenderConfig::default());
    let first = host.panel.set_content("old", false).unwrap();
    host.set("new", false);
    assert!(!host.panel.fire(first.ticket));
    assert_eq!(host.html(), None);
    host.advance(MS * 10);
    assert_eq!(host.html(), Some("<p>new</p>"));
}

#[test]
fn clearing_content_is_synchronous_and_cancels_pending_render() {
    let mut host = Host::new(RenderConfig::default());
    host.panel = Panel::new(RenderConfig::default(), Container::default()).with_content("shown");
    host.panel.mount();
    assert_eq!(host.html(), Some("<p>shown</p>"));

    host.set("pending", true);
    let stale = host.timer.map(|(_, ticket)| ticket).unwrap();
    host.set("  \n ", true);
    assert_eq!(host.html(), None);
    assert!(!host.panel.fire(stale));
    assert_eq!(host.html(), None);
}

#[test]
fn mount_renders_without_waiting() {
    let mut host = Host::new(RenderConfig::default());
    host.panel = Panel::new(RenderConfig::default(), Container::default())
        .with_content("```rust\nfn main() {}\n```");
    host.panel.mount();
    let html = host.html().unwrap();
    assert!(html.contains("class=\"language-rust\""));
    assert!(!html.contains(CODE_WRAPPER_CLASS));
    assert!(!html.contains(CODE_LABEL_CLASS));
    assert_eq!(host.panel.surface().annotation_requests, 1);
}

#[test]
fn every_write_is_one_complete_document() {
    let mut host = Host::new(RenderConfig::default());
    for content in ["# T", "# Title\n\nBody", "# Title\n\nBody\n\n- item"] {
        host.set(content, true);
        host.advance(MS * 5);
    }
    let writes = &host.panel.surface().writes;
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[2], "<h1>Title</h1><p>Body</p><ul><li>item</li></ul>");
}

#[test]
fn failed_render_shows_inline_error() {
    let mut host = Host::new(RenderConfig {
        strict_parse: true,
        ..Default::default()
    });
    host.set("fine", false);
    host.advance(MS * 10);
    assert_eq!(host.panel.error(), None);

    host.set("broken\n\n</div>", false);
    host.advance(MS * 10);
    let error = host.panel.error().expect("error recorded");
    assert!(!error.is_empty());
    assert_eq!(host.panel.state(), RenderState::Error);
    let html = host.html().unwrap();
    assert!(html.starts_with("<div class=\"markdown-error\">Error rendering markdown: "));
    assert!(html.ends_with("</div>"));
    assert_eq!(host.panel.surface().annotation_requests, 1);
}
