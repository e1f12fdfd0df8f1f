//! Two-digit keypad entry with idle timeout.
//!
//! Entry is the one place the control task waits. It polls the keypad,
//! pausing on the supplied delay between polls so the periodic tasks keep
//! running, and gives up as soon as the Timeout Timer raises its flag. Every
//! accepted digit restarts the countdown.

use embedded_hal_async::delay::DelayNs;

use crate::bcd;
use crate::display::CharDisplay;
use crate::keypad::Keypad;
use crate::timeout::TimeoutTimer;
use crate::{Error, KEY_DEBOUNCE_MS, KEY_POLL_MS, KEY_SCHEDULE, KEY_SETPOINT};

/// Keys that open screens; ignored during entry.
pub const fn is_command_key(key: char) -> bool {
    key == KEY_SETPOINT || key == KEY_SCHEDULE
}

/// Read two keys and return them packed as BCD.
///
/// Returns `Ok(None)` when the timeout fires first; the flag stays set for
/// the caller to see. Any key other than the command keys is accepted and
/// echoed at the cursor.
pub async fn read_bcd<K, D, W>(
    keypad: &mut K,
    display: &mut D,
    timeout: &TimeoutTimer,
    delay: &mut W,
) -> Result<Option<u8>, Error>
where
    K: Keypad,
    D: CharDisplay,
    W: DelayNs,
{
    timeout.rearm();
    let mut digits = [b'0'; 2];
    let mut accepted = 0;

    while accepted < digits.len() {
        if timeout.is_expired() {
            return Ok(None);
        }
        match keypad.read_key().map_err(|_| Error::Keypad)? {
            Some(key) if !is_command_key(key) => {
                timeout.reload();
                digits[accepted] = key as u8;
                accepted += 1;
                display.put_char(key).map_err(|_| Error::Display)?;
                display.flush().map_err(|_| Error::Display)?;
                delay.delay_ms(KEY_DEBOUNCE_MS).await;
            }
            _ => delay.delay_ms(KEY_POLL_MS).await,
        }
    }

    Ok(Some(bcd::encode(digits)))
}

/// Keypad, display, timeout and pacing delay bundled for the screens.
pub struct Console<'a, K, D, W> {
    pub keypad: &'a mut K,
    pub display: &'a mut D,
    pub timeout: &'a TimeoutTimer,
    pub delay: &'a mut W,
}

impl<'a, K, D, W> Console<'a, K, D, W>
where
    K: Keypad,
    D: CharDisplay,
    W: DelayNs,
{
    pub fn new(keypad: &'a mut K, display: &'a mut D, timeout: &'a TimeoutTimer, delay: &'a mut W) -> Self {
        Self { keypad, display, timeout, delay }
    }

    /// Clear the screen and write `text` on the first row.
    pub fn show(&mut self, text: &str) -> Result<(), Error> {
        self.display.clear().map_err(|_| Error::Display)?;
        self.display.put_str(text).map_err(|_| Error::Display)?;
        self.display.flush().map_err(|_| Error::Display)
    }

    /// Prompt once and read a decimal value. `None` on timeout.
    pub async fn ask(&mut self, label: &str) -> Result<Option<u8>, Error> {
        self.show(label)?;
        let value = read_bcd(&mut *self.keypad, &mut *self.display, self.timeout, &mut *self.delay).await?;
        Ok(value.map(bcd::decode))
    }

    /// Prompt until `valid` accepts the value or the timeout fires.
    pub async fn ask_until(
        &mut self,
        label: &str,
        valid: impl Fn(u8) -> bool,
    ) -> Result<Option<u8>, Error> {
        loop {
            match self.ask(label).await? {
                Some(value) if valid(value) => return Ok(Some(value)),
                Some(value) => debug!("rejected {} for {}", value, label),
                None => return Ok(None),
            }
        }
    }

    pub async fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}
