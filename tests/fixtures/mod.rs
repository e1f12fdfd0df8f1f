//! Test doubles for the thermostat's collaborators.
//!
//! Provides:
//! - `MockDisplay`: 16x2 character grid with a transcript of everything written
//! - `MockKeypad`: scripted key presses, idle once the script runs out
//! - `MockClock`: BCD clock registers with a record of writes
//! - `MockStorage`: the five settings slots
//! - `MockHeater`: output pin that remembers its level
//! - `MockDelay`: async delay that drives the timeout tick as time passes
//! - `FixedAdc`: analog front-end returning one raw value

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use thermo_rs::display::{CharDisplay, COLUMNS, ROWS};
use thermo_rs::keypad::Keypad;
use thermo_rs::rtc::ClockChip;
use thermo_rs::sensor::AnalogFrontEnd;
use thermo_rs::state::SharedState;
use thermo_rs::storage::ByteStorage;
use thermo_rs::timeout::{self, TimeoutTimer};
use thermo_rs::TIMEOUT_TICK_MS;

// ============================================================================
// MockDisplay
// ============================================================================

#[derive(Debug)]
pub struct MockDisplay {
    cells: [[char; COLUMNS as usize]; ROWS as usize],
    cursor: (u8, u8),
    /// Every character ever written, in order
    pub transcript: String,
    pub clears: usize,
    pub flushes: usize,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[' '; COLUMNS as usize]; ROWS as usize],
            cursor: (0, 0),
            transcript: String::new(),
            clears: 0,
            flushes: 0,
        }
    }

    pub fn row(&self, row: u8) -> String {
        self.cells[row as usize].iter().collect()
    }

    /// `len` characters starting at `at`.
    pub fn text_at(&self, at: (u8, u8), len: usize) -> String {
        self.cells[at.1 as usize].iter().skip(at.0 as usize).take(len).collect()
    }

    /// Number of times `prompt` was written.
    pub fn prompt_count(&self, prompt: &str) -> usize {
        self.transcript.matches(prompt).count()
    }
}

impl CharDisplay for MockDisplay {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.cells = [[' '; COLUMNS as usize]; ROWS as usize];
        self.cursor = (0, 0);
        self.clears += 1;
        Ok(())
    }

    fn goto(&mut self, col: u8, row: u8) -> Result<(), Infallible> {
        assert!(col < COLUMNS && row < ROWS, "goto({}, {}) off screen", col, row);
        self.cursor = (col, row);
        Ok(())
    }

    fn put_char(&mut self, c: char) -> Result<(), Infallible> {
        let (col, row) = self.cursor;
        if col < COLUMNS {
            self.cells[row as usize][col as usize] = c;
            self.cursor = (col + 1, row);
        }
        self.transcript.push(c);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        self.flushes += 1;
        Ok(())
    }
}

// ============================================================================
// MockKeypad
// ============================================================================

/// Each scripted key is returned by one poll; `-` in a script is a poll with
/// no key. Once the script runs out every poll is idle.
#[derive(Debug, Default)]
pub struct MockKeypad {
    keys: VecDeque<char>,
    pub polls: usize,
}

impl MockKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typing(keys: &str) -> Self {
        Self { keys: keys.chars().collect(), polls: 0 }
    }

    pub fn push(&mut self, keys: &str) {
        self.keys.extend(keys.chars());
    }

    pub fn pending(&self) -> usize {
        self.keys.len()
    }
}

impl Keypad for MockKeypad {
    type Error = Infallible;

    fn read_key(&mut self) -> Result<Option<char>, Infallible> {
        self.polls += 1;
        Ok(self.keys.pop_front().filter(|&k| k != '-'))
    }
}

// ============================================================================
// MockClock
// ============================================================================

/// Registers hold packed BCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockClock {
    pub time: (u8, u8, u8),
    pub date: (u8, u8, u8),
    pub writes: usize,
}

impl MockClock {
    pub fn at(time: (u8, u8, u8), date: (u8, u8, u8)) -> Self {
        Self { time, date, writes: 0 }
    }
}

impl ClockChip for MockClock {
    type Error = Infallible;

    fn get_time(&mut self) -> Result<(u8, u8, u8), Infallible> {
        Ok(self.time)
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Infallible> {
        self.time = (hour, minute, second);
        self.writes += 1;
        Ok(())
    }

    fn get_date(&mut self) -> Result<(u8, u8, u8), Infallible> {
        Ok(self.date)
    }

    fn set_date(&mut self, day: u8, month: u8, year: u8) -> Result<(), Infallible> {
        self.date = (day, month, year);
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// MockStorage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStorage {
    pub slots: [u8; 5],
    /// `(slot, value)` for every write
    pub writes: Vec<(u8, u8)>,
}

impl MockStorage {
    pub fn with(slots: [u8; 5]) -> Self {
        Self { slots, writes: Vec::new() }
    }

    /// Factory settings: 25 °C, ON 08:00, OFF 18:00.
    pub fn factory() -> Self {
        Self::with([0x25, 0x08, 0x00, 0x18, 0x00])
    }

    pub fn erased() -> Self {
        Self::with([0xFF; 5])
    }
}

impl ByteStorage for MockStorage {
    type Error = Infallible;

    fn read_byte(&mut self, slot: u8) -> Result<u8, Infallible> {
        Ok(self.slots[slot as usize])
    }

    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Infallible> {
        self.slots[slot as usize] = value;
        self.writes.push((slot, value));
        Ok(())
    }
}

// ============================================================================
// MockHeater
// ============================================================================

#[derive(Debug, Default)]
pub struct MockHeater {
    pub high: bool,
    pub writes: usize,
}

impl embedded_hal::digital::ErrorType for MockHeater {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockHeater {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// MockDelay
// ============================================================================

/// Completes immediately, but runs the timeout service once for every
/// timeout period of simulated time.
pub struct MockDelay<'a> {
    timer: &'a TimeoutTimer,
    state: &'a SharedState,
    pending_ns: u64,
    pub elapsed_ms: u64,
}

impl<'a> MockDelay<'a> {
    pub fn new(timer: &'a TimeoutTimer, state: &'a SharedState) -> Self {
        Self { timer, state, pending_ns: 0, elapsed_ms: 0 }
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        const TICK_NS: u64 = TIMEOUT_TICK_MS as u64 * 1_000_000;
        self.pending_ns += ns as u64;
        while self.pending_ns >= TICK_NS {
            self.pending_ns -= TICK_NS;
            self.elapsed_ms += TIMEOUT_TICK_MS as u64;
            timeout::service(self.timer, self.state);
        }
    }
}

// ============================================================================
// FixedAdc
// ============================================================================

/// Raw 186 reads as 20 °C with the default calibration.
pub struct FixedAdc(pub u16);

impl AnalogFrontEnd for FixedAdc {
    type Error = Infallible;

    fn sample_raw(&mut self) -> Result<u16, Infallible> {
        Ok(self.0)
    }
}
