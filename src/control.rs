//! The control loop: settings reload, command dispatch and the heater
//! decision.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::display::CharDisplay;
use crate::entry::Console;
use crate::keypad::Keypad;
use crate::rtc::ClockChip;
use crate::schedule::{Schedule, Window};
use crate::screens::{self, Outcome};
use crate::state::SharedState;
use crate::storage::{ByteStorage, Settings};
use crate::timeout::TimeoutTimer;
use crate::{Error, KEY_SCHEDULE, KEY_SETPOINT, SPLASH_MS, WELCOME_MS};

/// Heater level for one reading, or `None` to leave it as it is.
///
/// Below setpoint the window decides; above setpoint the heater is always
/// off. At exactly the setpoint neither rule applies, which is the only
/// dead-band the controller has.
pub const fn decide(temperature: i16, setpoint: u8, in_window: bool) -> Option<bool> {
    let setpoint = setpoint as i16;
    if temperature < setpoint {
        Some(in_window)
    } else if temperature > setpoint {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Setpoint,
    Schedule,
}

impl Command {
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            KEY_SETPOINT => Some(Command::Setpoint),
            KEY_SCHEDULE => Some(Command::Schedule),
            _ => None,
        }
    }
}

pub struct Thermostat<'a, K, S, H> {
    state: &'a SharedState,
    timeout: &'a TimeoutTimer,
    keypad: K,
    storage: S,
    heater: H,
    reported_schedule: Option<Schedule>,
}

impl<'a, K, S, H> Thermostat<'a, K, S, H>
where
    K: Keypad,
    S: ByteStorage,
    H: OutputPin,
{
    pub fn new(state: &'a SharedState, timeout: &'a TimeoutTimer, keypad: K, storage: S, heater: H) -> Self {
        Self { state, timeout, keypad, storage, heater, reported_schedule: None }
    }

    /// Splash, factory defaults for erased storage, the clock screen, then
    /// hand over to normal mode. Runs entirely in configuration mode so the
    /// sampling task stays off the display.
    pub async fn boot<D, C, W>(&mut self, display: &mut D, clock: &mut C, delay: &mut W) -> Result<(), Error>
    where
        D: CharDisplay,
        C: ClockChip,
        W: DelayNs,
    {
        info!("thermostat boot");
        let _session = self.state.enter_configuration(self.timeout);
        self.heater.set_low().map_err(|_| Error::Heater)?;
        self.state.set_heater_on(false);

        let mut console = Console::new(&mut self.keypad, display, self.timeout, delay);
        console.show("  Temperature")?;
        console.display.goto(0, 1).map_err(|_| Error::Display)?;
        console.display.put_str("    Control").map_err(|_| Error::Display)?;
        console.display.flush().map_err(|_| Error::Display)?;
        console.pause_ms(SPLASH_MS).await;

        let stored = Settings::load(&mut self.storage).map_err(|_| Error::Storage)?;
        if !stored.is_valid() {
            warn!("stored settings out of range, writing factory defaults");
            Settings::FACTORY.store(&mut self.storage).map_err(|_| Error::Storage)?;
        }

        if screens::set_clock(&mut console, clock).await? == Outcome::Abandoned {
            info!("clock left unchanged");
        }

        console.show("    WELCOME")?;
        console.pause_ms(WELCOME_MS).await;
        console.display.clear().map_err(|_| Error::Display)?;
        console.display.flush().map_err(|_| Error::Display)?;

        self.reload_settings()?;
        Ok(())
    }

    /// One iteration: reload settings, poll the keypad once, run a screen if
    /// a command key was pressed, then drive the heater.
    pub async fn step<D, W>(&mut self, display: &mut D, delay: &mut W) -> Result<(), Error>
    where
        D: CharDisplay,
        W: DelayNs,
    {
        self.reload_settings()?;
        self.timeout.rearm();

        let key = self.keypad.read_key().map_err(|_| Error::Keypad)?;
        if let Some(command) = key.and_then(Command::from_key) {
            self.configure(command, display, delay).await?;
        }

        self.regulate()?;
        Ok(())
    }

    /// Run one configuration screen with the sampling task paused.
    pub async fn configure<D, W>(&mut self, command: Command, display: &mut D, delay: &mut W) -> Result<Outcome, Error>
    where
        D: CharDisplay,
        W: DelayNs,
    {
        info!("entering {:?} screen", command);
        let _session = self.state.enter_configuration(self.timeout);
        let mut console = Console::new(&mut self.keypad, display, self.timeout, delay);
        let outcome = match command {
            Command::Setpoint => screens::set_setpoint(&mut console, &mut self.storage).await,
            Command::Schedule => screens::set_schedule(&mut console, &mut self.storage).await,
        };
        console.display.clear().map_err(|_| Error::Display)?;
        console.display.flush().map_err(|_| Error::Display)?;
        outcome
    }

    /// Read the five settings slots and publish them. Out-of-range contents
    /// are ignored and the previous values kept.
    pub fn reload_settings(&mut self) -> Result<Settings, Error> {
        let settings = Settings::load(&mut self.storage).map_err(|_| Error::Storage)?;
        if settings.is_valid() {
            self.state.set_setpoint(settings.setpoint);
            self.state.set_schedule(settings.schedule);
            Ok(settings)
        } else {
            warn!("ignoring out-of-range settings");
            Ok(Settings { setpoint: self.state.setpoint(), schedule: self.state.schedule() })
        }
    }

    /// Apply the heater decision for the published temperature, setpoint,
    /// schedule and clock. Returns the level written, if any. Nothing is
    /// written before the first sample is published.
    pub fn regulate(&mut self) -> Result<Option<bool>, Error> {
        if !self.state.has_sample() {
            return Ok(None);
        }

        let schedule = self.state.schedule();
        let window = schedule.window();
        if let Window::Unsupported { .. } = window {
            if self.reported_schedule != Some(schedule) {
                warn!("schedule crosses midnight, heating disabled");
                self.reported_schedule = Some(schedule);
            }
        }

        let minutes_now = self.state.clock().minutes_since_midnight();
        let temperature = self.state.temperature();
        let setpoint = self.state.setpoint();

        let level = decide(temperature, setpoint, window.contains(minutes_now));
        if let Some(on) = level {
            if on {
                self.heater.set_high().map_err(|_| Error::Heater)?;
            } else {
                self.heater.set_low().map_err(|_| Error::Heater)?;
            }
            if self.state.heater_on() != on {
                info!("heater {} at {} C (setpoint {} C)", if on { "on" } else { "off" }, temperature, setpoint);
                self.state.set_heater_on(on);
            }
        }
        Ok(level)
    }

    pub fn heater(&self) -> &H {
        &self.heater
    }

    pub fn storage(&mut self) -> &mut S {
        &mut self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_setpoint_follows_window() {
        assert_eq!(decide(25, 30, true), Some(true));
        assert_eq!(decide(25, 30, false), Some(false));
    }

    #[test]
    fn above_setpoint_is_always_off() {
        assert_eq!(decide(31, 30, true), Some(false));
        assert_eq!(decide(31, 30, false), Some(false));
    }

    #[test]
    fn at_setpoint_leaves_heater_alone() {
        assert_eq!(decide(30, 30, true), None);
        assert_eq!(decide(30, 30, false), None);
    }

    #[test]
    fn negative_temperatures_heat() {
        assert_eq!(decide(-5, 21, true), Some(true));
    }

    #[test]
    fn command_keys() {
        assert_eq!(Command::from_key('*'), Some(Command::Setpoint));
        assert_eq!(Command::from_key('#'), Some(Command::Schedule));
        assert_eq!(Command::from_key('5'), None);
    }
}
