//! State shared between the periodic tasks and the control loop.
//!
//! Single scalars are atomics. Multi-field values (the clock reading, the
//! schedule) sit behind a critical-section mutex so a reader never sees half
//! of an update.
//!
//! The `configuring` flag decides which periodic task is live: the Timeout
//! Timer counts only while a configuration screen is open, the Sampling Timer
//! runs only while none is. Flipping that one flag disables one task and
//! enables the other in the same step.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, AtomicI16, AtomicU8, Ordering};

use crate::rtc::ClockReading;
use crate::schedule::Schedule;
use crate::timeout::TimeoutTimer;
use crate::{
    DEFAULT_HOUR_OFF, DEFAULT_HOUR_ON, DEFAULT_MINUTE_OFF, DEFAULT_MINUTE_ON, DEFAULT_SETPOINT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Sampling Timer live, Timeout Timer idle
    Normal,
    /// A configuration screen owns display and keypad; Timeout Timer live
    Configuring,
}

pub struct SharedState {
    configuring: AtomicBool,
    temperature: AtomicI16,
    setpoint: AtomicU8,
    heater_on: AtomicBool,
    redraw: AtomicBool,
    sampled: AtomicBool,
    clock: Mutex<CriticalSectionRawMutex, Cell<ClockReading>>,
    schedule: Mutex<CriticalSectionRawMutex, Cell<Schedule>>,
}

impl SharedState {
    /// Starts in [`Mode::Configuring`]: the boot sequence owns the display
    /// until it hands over to the control loop.
    pub const fn new() -> Self {
        Self {
            configuring: AtomicBool::new(true),
            temperature: AtomicI16::new(0),
            setpoint: AtomicU8::new(DEFAULT_SETPOINT),
            heater_on: AtomicBool::new(false),
            redraw: AtomicBool::new(true),
            sampled: AtomicBool::new(false),
            clock: Mutex::new(Cell::new(ClockReading::MIDNIGHT)),
            schedule: Mutex::new(Cell::new(Schedule::new(
                DEFAULT_HOUR_ON,
                DEFAULT_MINUTE_ON,
                DEFAULT_HOUR_OFF,
                DEFAULT_MINUTE_OFF,
            ))),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.configuring.load(Ordering::Acquire) {
            Mode::Configuring
        } else {
            Mode::Normal
        }
    }

    /// Hand display and keypad to a configuration screen until the guard
    /// drops. The idle timeout starts from a full countdown with its flag
    /// cleared.
    pub fn enter_configuration<'a>(&'a self, timeout: &TimeoutTimer) -> ConfigSession<'a> {
        self.configuring.store(true, Ordering::Release);
        timeout.rearm();
        ConfigSession { state: self }
    }

    /// Return to normal mode, e.g. at the end of the boot sequence.
    pub fn resume_normal(&self) {
        self.configuring.store(false, Ordering::Release);
        self.redraw.store(true, Ordering::Release);
    }

    /// Publish one sampling tick's temperature and clock reading.
    pub fn publish_sample(&self, degrees: i16, reading: ClockReading) {
        self.set_temperature(degrees);
        self.set_clock(reading);
        self.sampled.store(true, Ordering::Release);
    }

    /// `false` until the first sample is published; temperature and clock
    /// hold placeholders until then.
    pub fn has_sample(&self) -> bool {
        self.sampled.load(Ordering::Acquire)
    }

    pub fn temperature(&self) -> i16 {
        self.temperature.load(Ordering::Acquire)
    }

    pub fn set_temperature(&self, degrees: i16) {
        self.temperature.store(degrees, Ordering::Release);
    }

    pub fn setpoint(&self) -> u8 {
        self.setpoint.load(Ordering::Acquire)
    }

    pub fn set_setpoint(&self, degrees: u8) {
        self.setpoint.store(degrees, Ordering::Release);
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on.load(Ordering::Acquire)
    }

    pub fn set_heater_on(&self, on: bool) {
        self.heater_on.store(on, Ordering::Release);
    }

    pub fn clock(&self) -> ClockReading {
        self.clock.lock(|c| c.get())
    }

    pub fn set_clock(&self, reading: ClockReading) {
        self.clock.lock(|c| c.set(reading));
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule.lock(|s| s.get())
    }

    pub fn set_schedule(&self, schedule: Schedule) {
        self.schedule.lock(|s| s.set(schedule));
    }

    /// Consume a pending redraw request.
    pub fn take_redraw(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration mode held open; dropping it returns to normal mode and asks
/// the Sampling Timer for a full redraw.
pub struct ConfigSession<'a> {
    state: &'a SharedState,
}

impl Drop for ConfigSession<'_> {
    fn drop(&mut self) {
        self.state.resume_normal();
    }
}
