//! Idle timeout for keypad entry.
//!
//! A fast periodic tick (see [`crate::TIMEOUT_TICK_MS`]) counts down; when the
//! count reaches zero the `expired` flag is raised and the count reloads. The
//! timer never clears the flag itself: whoever starts a new blocking wait
//! calls [`TimeoutTimer::rearm`], and every accepted key calls
//! [`TimeoutTimer::reload`].
//!
//! Both fields are single atomics, so the tick may run from an interrupt or
//! another task while the entry loop reads them.

use portable_atomic::{AtomicBool, AtomicU16, Ordering};

use crate::state::{Mode, SharedState};

pub struct TimeoutTimer {
    countdown: AtomicU16,
    expired: AtomicBool,
    max_ticks: u16,
}

impl TimeoutTimer {
    pub const fn new(max_ticks: u16) -> Self {
        Self {
            countdown: AtomicU16::new(max_ticks),
            expired: AtomicBool::new(false),
            max_ticks,
        }
    }

    /// One period elapsed. Returns `true` on the tick that raised the flag.
    pub fn tick(&self) -> bool {
        let previous = self.countdown.fetch_sub(1, Ordering::AcqRel);
        if previous <= 1 {
            self.countdown.store(self.max_ticks, Ordering::Release);
            self.expired.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Restart the countdown after accepted input. Leaves the flag alone.
    pub fn reload(&self) {
        self.countdown.store(self.max_ticks, Ordering::Release);
    }

    /// Start a fresh wait: full countdown, flag cleared.
    pub fn rearm(&self) {
        self.reload();
        self.expired.store(false, Ordering::Release);
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }

    pub fn remaining(&self) -> u16 {
        self.countdown.load(Ordering::Acquire)
    }
}

/// Body of the fast periodic task. Counts only while a configuration screen
/// is open; in normal mode the tick is a no-op.
pub fn service(timer: &TimeoutTimer, state: &SharedState) -> bool {
    if state.mode() != Mode::Configuring {
        return false;
    }
    let fired = timer.tick();
    if fired {
        debug!("entry idle timeout");
    }
    fired
}
