//! Body of the slow periodic task: sample, read the clock, redraw.
//!
//! One call per period, run to completion, never waits on the operator. The
//! temperature and clock drawn in a tick are the ones sampled in that same
//! tick. Skipped entirely while a configuration screen owns the display.

use crate::display::{self, CharDisplay};
use crate::rtc::{ClockChip, ClockReading};
use crate::sensor::{AnalogFrontEnd, Calibration, TemperatureSensor};
use crate::state::{Mode, SharedState};
use crate::{Error, SUBDISPLAY_TICKS};

/// Alternates the bottom-right field between the OFF and ON times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Alternator {
    show_on: bool,
    countdown: u8,
}

impl Alternator {
    const fn new() -> Self {
        Self { show_on: false, countdown: 0 }
    }

    /// Which field to draw this tick, if any.
    fn step(&mut self) -> Option<bool> {
        let due = if self.countdown == 0 {
            let on = self.show_on;
            self.show_on = !self.show_on;
            self.countdown = SUBDISPLAY_TICKS;
            Some(on)
        } else {
            None
        };
        self.countdown -= 1;
        due
    }

    /// Draw on the next tick, starting again from OFF.
    fn restart(&mut self) {
        *self = Self::new();
    }
}

pub struct Sampler<A, C> {
    sensor: TemperatureSensor<A, C>,
    alternator: Alternator,
}

impl<A, C> Sampler<A, C>
where
    A: AnalogFrontEnd,
    C: Calibration,
{
    pub fn new(sensor: TemperatureSensor<A, C>) -> Self {
        Self { sensor, alternator: Alternator::new() }
    }

    /// Returns `Ok(false)` when skipped because of configuration mode.
    pub fn on_tick<D, K>(&mut self, state: &SharedState, display: &mut D, clock: &mut K) -> Result<bool, Error>
    where
        D: CharDisplay,
        K: ClockChip,
    {
        if state.mode() != Mode::Normal {
            return Ok(false);
        }
        if state.take_redraw() {
            self.alternator.restart();
        }

        let temperature = self.sensor.read_celsius()?;
        let now = ClockReading::read(clock).map_err(|_| Error::Clock)?;
        state.publish_sample(temperature, now);

        self.render(state, display, temperature, &now).map_err(|_| Error::Display)?;
        Ok(true)
    }

    fn render<D: CharDisplay>(
        &mut self,
        state: &SharedState,
        out: &mut D,
        temperature: i16,
        now: &ClockReading,
    ) -> Result<(), D::Error> {
        display::write_at(out, display::TEMPERATURE_AT, &display::temperature_text(temperature))?;
        display::write_at(out, display::DATE_AT, &display::date_text(now.day, now.month))?;
        display::write_at(out, display::TIME_AT, &display::time_text(now.hour, now.minute))?;
        display::write_at(out, display::SETPOINT_AT, &display::setpoint_text(state.setpoint()))?;

        if let Some(show_on) = self.alternator.step() {
            let schedule = state.schedule();
            let text = if show_on {
                display::schedule_text(true, schedule.hour_on, schedule.minute_on)
            } else {
                display::schedule_text(false, schedule.hour_off, schedule.minute_off)
            };
            display::write_at(out, display::SCHEDULE_AT, &text)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternator_toggles_every_five_ticks_starting_with_off() {
        let mut a = Alternator::new();
        let drawn: heapless::Vec<Option<bool>, 12> = (0..11).map(|_| a.step()).collect();
        assert_eq!(
            drawn.as_slice(),
            &[
                Some(false), None, None, None, None,
                Some(true), None, None, None, None,
                Some(false),
            ]
        );
    }

    #[test]
    fn restart_draws_off_next() {
        let mut a = Alternator::new();
        a.step();
        a.step();
        a.restart();
        assert_eq!(a.step(), Some(false));
    }
}
