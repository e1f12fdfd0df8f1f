#![cfg_attr(not(test), no_std)]

//! Thermostat core: hysteresis control of a heater gated by a daily time
//! window, with keypad configuration and a 16x2 character status screen.
//!
//! Everything here is hardware-agnostic. Collaborators (display, keypad,
//! clock chip, byte storage, analog front-end, heater pin) are traits, and
//! the firmware in `main.rs` wires them to the RP2040.

#[macro_use]
mod fmt;

pub mod bcd;
pub mod control;
pub mod display;
pub mod ds1307;
pub mod eeprom;
pub mod entry;
pub mod error;
pub mod keypad;
pub mod rtc;
pub mod sampler;
pub mod schedule;
pub mod screens;
pub mod sensor;
pub mod sh1107;
pub mod state;
pub mod storage;
pub mod timeout;

pub use error::Error;

pub const MIN_SETPOINT: u8 = 21; // Lowest selectable setpoint (degrees C)
pub const MAX_SETPOINT: u8 = 40; // Highest selectable setpoint (degrees C)

pub const TIMEOUT_TICK_MS: u32 = 10; // Timeout Timer period
pub const TIMEOUT_TICKS: u16 = 500; // Ticks without a keypress before entry is abandoned (5 s)
pub const SAMPLE_PERIOD_MS: u64 = 1000; // Sampling Timer period
pub const SUBDISPLAY_TICKS: u8 = 5; // Sampling ticks between ON/OFF sub-display toggles
pub const CONTROL_PERIOD_MS: u64 = 20; // Pause between control loop iterations

pub const KEY_POLL_MS: u32 = 10; // Keypad poll interval while waiting for a digit
pub const KEY_DEBOUNCE_MS: u32 = 250; // Hold-off after an accepted digit

pub const KEY_SETPOINT: char = '*'; // Opens the setpoint screen
pub const KEY_SCHEDULE: char = '#'; // Opens the ON/OFF schedule screen

pub const DEFAULT_SETPOINT: u8 = 25; // Seeded into erased storage
pub const DEFAULT_HOUR_ON: u8 = 8;
pub const DEFAULT_MINUTE_ON: u8 = 0;
pub const DEFAULT_HOUR_OFF: u8 = 18;
pub const DEFAULT_MINUTE_OFF: u8 = 0;

pub const SPLASH_MS: u32 = 2000; // Boot banner
pub const WELCOME_MS: u32 = 1000;
