//! Trailing-debounce scheduling for panel re-renders.
//!
//! The scheduler never owns a timer. It hands out a [`Ticket`] for each
//! qualifying change and keeps exactly one pending slot; the host arms a timer
//! for the ticket and reports back with [`RenderScheduler::fire`]. Only the
//! ticket currently in the slot is honoured, so a burst of changes yields a
//! single render of the last value no matter how the host's timers behave.

use std::time::Duration;

use crate::config::RenderConfig;

/// Identifies one scheduled render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A timer the host should arm, replacing any it armed before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub delay: Duration,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Render synchronously, bypassing the debounce.
    Now,
    After(Schedule),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    Scheduled,
    Rendering,
    Error,
}

#[derive(Debug, Clone)]
pub struct RenderScheduler {
    streaming_delay: Duration,
    idle_delay: Duration,
    pending: Option<Ticket>,
    next_ticket: u64,
    rendering: bool,
    failed: bool,
}

impl RenderScheduler {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            streaming_delay: config.streaming_debounce(),
            idle_delay: config.idle_debounce(),
            pending: None,
            next_ticket: 0,
            rendering: false,
            failed: false,
        }
    }

    pub fn state(&self) -> RenderState {
        if self.rendering {
            RenderState::Rendering
        } else if self.pending.is_some() {
            RenderState::Scheduled
        } else if self.failed {
            RenderState::Error
        } else {
            RenderState::Idle
        }
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// Content changed. Blank content renders at once; anything else
    /// takes the pending slot.
    pub fn on_change(&mut self, blank: bool, streaming: bool) -> Trigger {
        if blank {
            self.cancel();
            return Trigger::Now;
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        if let Some(replaced) = self.pending.replace(ticket) {
            tracing::trace!(?replaced, ?ticket, "debounce reset");
        }

        let delay = if streaming {
            self.streaming_delay
        } else {
            self.idle_delay
        };
        Trigger::After(Schedule { delay, ticket })
    }

    /// Mounting always renders straight away.
    pub fn on_mount(&mut self) -> Trigger {
        self.cancel();
        Trigger::Now
    }

    /// A timer elapsed. Returns whether the render should run.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            tracing::trace!(?ticket, "ignoring superseded render timer");
            false
        }
    }

    /// Drop the pending render, if any.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take()
    }

    pub fn begin(&mut self) {
        self.rendering = true;
    }

    pub fn finish(&mut self, ok: bool) {
        self.rendering = false;
        self.failed = !ok;
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(trigger: Trigger) -> Schedule {
        match trigger {
            Trigger::After(schedule) => schedule,
            Trigger::Now => panic!("expected a debounced render"),
        }
    }

    #[test]
    fn delay_depends_on_streaming() {
        let mut scheduler = RenderScheduler::default();
        assert_eq!(
            schedule(scheduler.on_change(false, true)).delay,
            Duration::from_millis(5)
        );
        assert_eq!(
            schedule(scheduler.on_change(false, false)).delay,
            Duration::from_millis(10)
        );
    }

    #[test]
    fn only_last_ticket_fires() {
        let mut scheduler = RenderScheduler::default();
        let first = schedule(scheduler.on_change(false, false)).ticket;
        let second = schedule(scheduler.on_change(false, false)).ticket;
        let third = schedule(scheduler.on_change(false, false)).ticket;
        assert_eq!(scheduler.state(), RenderState::Scheduled);

        assert!(!scheduler.fire(first));
        assert!(!scheduler.fire(second));
        assert!(scheduler.fire(third));
        assert!(!scheduler.fire(third));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn blank_content_cancels_pending_render() {
        let mut scheduler = RenderScheduler::default();
        let ticket = schedule(scheduler.on_change(false, true)).ticket;
        assert_eq!(scheduler.on_change(true, true), Trigger::Now);
        assert!(!scheduler.fire(ticket));
    }

    #[test]
    fn mount_renders_now() {
        let mut scheduler = RenderScheduler::default();
        scheduler.on_change(false, false);
        assert_eq!(scheduler.on_mount(), Trigger::Now);
        assert_eq!(scheduler.state(), RenderState::Idle);
    }

    #[test]
    fn failure_is_remembered_until_next_success() {
        let mut scheduler = RenderScheduler::default();
        scheduler.begin();
        assert_eq!(scheduler.state(), RenderState::Rendering);
        scheduler.finish(false);
        assert_eq!(scheduler.state(), RenderState::Error);
        scheduler.begin();
        scheduler.finish(true);
        assert_eq!(scheduler.state(), RenderState::Idle);
    }
}
