//! Per-page validation attempt tracking and the one-shot focus target.
//!
//! Errors stay hidden until the user tries to advance: widgets only consult
//! their error lists while the attempt counter for the current page is
//! nonzero. Crossing to another page clears the counter.

use tracing::debug;

/// State machine keyed by `(page, seq)`.
#[derive(Debug, Default)]
pub struct ValidationCoordinator {
    page: Option<String>,
    seq: u32,
    /// Single-slot target awaiting one scroll+focus after the next render.
    /// Write-once, read-once: never survives more than one render cycle.
    pending_focus: Option<String>,
}

impl ValidationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Successful page transition: reset to `(name, 0)` and drop any pending
    /// focus from a previous attempt.
    pub fn set_page(&mut self, name: &str) {
        self.page = Some(name.to_string());
        self.seq = 0;
        self.pending_focus = None;
    }

    /// Failed advance attempt on `name`: first failure on a page starts the
    /// counter at 1, repeated failures on the same page increment it.
    pub fn bump(&mut self, name: &str) {
        if self.page.as_deref() == Some(name) {
            self.seq += 1;
        } else {
            self.page = Some(name.to_string());
            self.seq = 1;
        }
        debug!(page = name, seq = self.seq, "validation attempt failed");
    }

    /// Records the failure and the question that should receive focus.
    pub fn record_failure(&mut self, page: &str, focus: Option<String>) {
        self.pending_focus = focus;
        self.bump(page);
    }

    /// Consumes the pending focus target. At most one consumer per render
    /// pass sees it; unrelated re-renders never re-trigger the scroll.
    pub fn take_focus(&mut self) -> Option<String> {
        self.pending_focus.take()
    }
}
