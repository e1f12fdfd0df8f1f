//! Configuration screens.
//!
//! Each screen collects every field first and writes only once all of them
//! validate: a timeout at any prompt abandons the screen with nothing
//! committed. Out-of-range values re-prompt the same field.
//!
//! The caller owns the mode switch (see [`crate::state::SharedState::enter_configuration`]).

use embedded_hal_async::delay::DelayNs;

use crate::bcd;
use crate::display::CharDisplay;
use crate::entry::Console;
use crate::keypad::Keypad;
use crate::rtc::ClockChip;
use crate::schedule::Schedule;
use crate::storage::{self, setpoint_in_range, ByteStorage};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Committed,
    /// Timed out before every field was entered; nothing written
    Abandoned,
}

const fn valid_day(v: u8) -> bool {
    v >= 1 && v <= 31
}

const fn valid_month(v: u8) -> bool {
    v >= 1 && v <= 12
}

const fn valid_hour(v: u8) -> bool {
    v <= 23
}

const fn valid_minute(v: u8) -> bool {
    v <= 59
}

macro_rules! field {
    ($prompt:expr) => {
        match $prompt {
            Some(value) => value,
            None => {
                info!("configuration abandoned on timeout");
                return Ok(Outcome::Abandoned);
            }
        }
    };
}

/// Date and time; seconds are set to zero.
pub async fn set_clock<K, D, W, C>(console: &mut Console<'_, K, D, W>, clock: &mut C) -> Result<Outcome, Error>
where
    K: Keypad,
    D: CharDisplay,
    W: DelayNs,
    C: ClockChip,
{
    let day = field!(console.ask_until("Day:", valid_day).await?);
    let month = field!(console.ask_until("Month:", valid_month).await?);
    let year = field!(console.ask("Year:").await?);
    let hour = field!(console.ask_until("Hour:", valid_hour).await?);
    let minute = field!(console.ask_until("Minute:", valid_minute).await?);

    clock
        .set_time(bcd::from_decimal(hour), bcd::from_decimal(minute), 0x00)
        .map_err(|_| Error::Clock)?;
    clock
        .set_date(bcd::from_decimal(day), bcd::from_decimal(month), bcd::from_decimal(year))
        .map_err(|_| Error::Clock)?;
    info!("clock set to {}/{}/{} {}:{}", day, month, year, hour, minute);
    Ok(Outcome::Committed)
}

pub async fn set_setpoint<K, D, W, S>(console: &mut Console<'_, K, D, W>, store: &mut S) -> Result<Outcome, Error>
where
    K: Keypad,
    D: CharDisplay,
    W: DelayNs,
    S: ByteStorage,
{
    let setpoint = field!(console.ask_until("Temp:", setpoint_in_range).await?);

    storage::store_setpoint(store, setpoint).map_err(|_| Error::Storage)?;
    info!("setpoint stored: {} C", setpoint);
    Ok(Outcome::Committed)
}

pub async fn set_schedule<K, D, W, S>(console: &mut Console<'_, K, D, W>, store: &mut S) -> Result<Outcome, Error>
where
    K: Keypad,
    D: CharDisplay,
    W: DelayNs,
    S: ByteStorage,
{
    let hour_on = field!(console.ask_until("Hour ON:", valid_hour).await?);
    let minute_on = field!(console.ask_until("Min ON:", valid_minute).await?);
    let hour_off = field!(console.ask_until("Hour OFF:", valid_hour).await?);
    let minute_off = field!(console.ask_until("Min OFF:", valid_minute).await?);

    let schedule = Schedule::new(hour_on, minute_on, hour_off, minute_off);
    if schedule.crosses_midnight() {
        warn!("schedule crosses midnight; heating window will stay closed");
    }
    storage::store_schedule(store, &schedule).map_err(|_| Error::Storage)?;
    info!(
        "schedule stored: ON {}:{} OFF {}:{}",
        hour_on, minute_on, hour_off, minute_off
    );
    Ok(Outcome::Committed)
}
