//! Redraw timer driver
//!
//! Turns [`TimerAction`]s into real timeouts. The engine decides, this task
//! only sleeps and reports which token expired.

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Duration, Instant, Timer};

use super::timer::{RedrawToken, TimerAction};

pub struct RedrawScheduler {
    commands: Signal<CriticalSectionRawMutex, TimerAction>,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RedrawScheduler {
    pub const fn new() -> Self {
        Self {
            commands: Signal::new(),
        }
    }

    /// Forward an engine timer decision. A newer command replaces one that
    /// was not picked up yet.
    pub fn apply(&self, action: TimerAction) {
        if action != TimerAction::Unchanged {
            self.commands.signal(action);
        }
    }

    /// Sleep until the armed redraw is due and hand its token to `on_fire`
    pub async fn run<F>(&self, mut on_fire: F) -> !
    where
        F: FnMut(RedrawToken),
    {
        let mut armed: Option<(RedrawToken, Instant)> = None;
        loop {
            let command = match armed {
                None => self.commands.wait().await,
                Some((token, deadline)) => {
                    match select(Timer::at(deadline), self.commands.wait()).await {
                        Either::First(()) => {
                            armed = None;
                            on_fire(token);
                            continue;
                        }
                        Either::Second(command) => command,
                    }
                }
            };

            armed = match command {
                TimerAction::Schedule(pending) => Some((
                    pending.token,
                    Instant::now() + Duration::from_millis(pending.delay_ms),
                )),
                TimerAction::Cancel => None,
                TimerAction::Unchanged => armed,
            };
        }
    }
}
