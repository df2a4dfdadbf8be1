//! Interactive mode redraw timer
//!
//! While the face is visible and interactive it is redrawn on every wall-clock
//! second boundary. Each scheduled redraw carries a [`RedrawToken`]; a token
//! that no longer matches the pending redraw was cancelled and is ignored.

use crate::trace;

/// Redraw period in interactive mode
pub const INTERACTIVE_UPDATE_RATE_MS: u64 = 1_000;

/// Delay from `now_ms` to the next update boundary
pub const fn delay_to_next_update(now_ms: u64) -> u64 {
    INTERACTIVE_UPDATE_RATE_MS - (now_ms % INTERACTIVE_UPDATE_RATE_MS)
}

/// Identifies one scheduled redraw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RedrawToken(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRedraw {
    pub token: RedrawToken,
    /// Epoch milliseconds the redraw is due at
    pub deadline_ms: u64,
    /// Milliseconds from scheduling until the deadline
    pub delay_ms: u64,
}

/// What the timer driver has to do after an update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Arm the timer for this redraw
    Schedule(PendingRedraw),
    /// Disarm any armed redraw
    Cancel,
    /// Leave the timer as it is
    Unchanged,
}

#[derive(Debug, Default)]
pub struct RedrawTimer {
    pending: Option<PendingRedraw>,
    generation: u32,
}

impl RedrawTimer {
    pub const fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    pub fn pending(&self) -> Option<PendingRedraw> {
        self.pending
    }

    /// Start or stop the timer depending on whether it should be running
    pub fn update(&mut self, should_run: bool, now_ms: u64) -> TimerAction {
        match (should_run, self.pending) {
            (true, Some(_)) => TimerAction::Unchanged,
            (true, None) => TimerAction::Schedule(self.schedule(now_ms)),
            (false, Some(_)) => {
                self.cancel();
                TimerAction::Cancel
            }
            (false, None) => TimerAction::Unchanged,
        }
    }

    /// Handle an expired redraw.
    ///
    /// Returns `None` for a cancelled token, otherwise the follow-up action
    /// after the redraw has been requested.
    pub fn fire(&mut self, token: RedrawToken, should_run: bool, now_ms: u64) -> Option<TimerAction> {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                Some(self.update(should_run, now_ms))
            }
            _ => {
                trace!("Ignoring stale redraw token {}", token.0);
                None
            }
        }
    }

    /// Drop the pending redraw, invalidating its token
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn schedule(&mut self, now_ms: u64) -> PendingRedraw {
        self.generation = self.generation.wrapping_add(1);
        let delay_ms = delay_to_next_update(now_ms);
        let pending = PendingRedraw {
            token: RedrawToken(self.generation),
            deadline_ms: now_ms + delay_ms,
            delay_ms,
        };
        self.pending = Some(pending);
        pending
    }
}
