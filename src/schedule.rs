//! Daily ON/OFF schedule and the heating window it defines.

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[inline]
pub const fn minutes_since_midnight(hour: u8, minute: u8) -> u16 {
    hour as u16 * 60 + minute as u16
}

/// ON and OFF times in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Schedule {
    pub hour_on: u8,
    pub minute_on: u8,
    pub hour_off: u8,
    pub minute_off: u8,
}

impl Schedule {
    pub const fn new(hour_on: u8, minute_on: u8, hour_off: u8, minute_off: u8) -> Self {
        Self { hour_on, minute_on, hour_off, minute_off }
    }

    pub const fn is_valid(&self) -> bool {
        self.hour_on <= 23 && self.minute_on <= 59 && self.hour_off <= 23 && self.minute_off <= 59
    }

    pub const fn start(&self) -> u16 {
        minutes_since_midnight(self.hour_on, self.minute_on)
    }

    pub const fn stop(&self) -> u16 {
        minutes_since_midnight(self.hour_off, self.minute_off)
    }

    /// OFF time earlier than ON time, i.e. the operator meant a window that
    /// spans midnight.
    pub const fn crosses_midnight(&self) -> bool {
        self.stop() < self.start()
    }

    pub const fn window(&self) -> Window {
        let (start, stop) = (self.start(), self.stop());
        if stop < start {
            Window::Unsupported { start, stop }
        } else {
            Window::Daily { start, stop }
        }
    }
}

/// Heating window in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Window {
    /// Half-open `[start, stop)`; empty when `start == stop`.
    Daily { start: u16, stop: u16 },
    /// Midnight-crossing schedule. Wraparound is not evaluated, so this
    /// window never contains any minute.
    Unsupported { start: u16, stop: u16 },
}

impl Window {
    pub const fn contains(&self, minutes_now: u16) -> bool {
        match *self {
            Window::Daily { start, stop } => start <= minutes_now && minutes_now < stop,
            Window::Unsupported { .. } => false,
        }
    }

    pub const fn is_supported(&self) -> bool {
        matches!(self, Window::Daily { .. })
    }
}
