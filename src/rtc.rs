//! Real-time clock collaborator and the decoded clock reading.

use crate::bcd;

/// Clock chip seen through its packed-BCD registers.
///
/// Tuples are `(hour, minute, second)` and `(day, month, year)`, each field
/// packed BCD, year as two digits.
pub trait ClockChip {
    type Error;

    fn get_time(&mut self) -> Result<(u8, u8, u8), Self::Error>;
    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Self::Error>;
    fn get_date(&mut self) -> Result<(u8, u8, u8), Self::Error>;
    fn set_date(&mut self, day: u8, month: u8, year: u8) -> Result<(), Self::Error>;
}

impl<T: ClockChip> ClockChip for &mut T {
    type Error = T::Error;

    fn get_time(&mut self) -> Result<(u8, u8, u8), Self::Error> {
        T::get_time(self)
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Self::Error> {
        T::set_time(self, hour, minute, second)
    }

    fn get_date(&mut self) -> Result<(u8, u8, u8), Self::Error> {
        T::get_date(self)
    }

    fn set_date(&mut self, day: u8, month: u8, year: u8) -> Result<(), Self::Error> {
        T::set_date(self, day, month, year)
    }
}

/// Date and time in decimal, as displayed and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    pub day: u8,    // 1-31
    pub month: u8,  // 1-12
    pub year: u8,   // 0-99
    pub hour: u8,   // 0-23
    pub minute: u8, // 0-59
    pub second: u8, // 0-59
}

impl ClockReading {
    pub const MIDNIGHT: Self = Self { day: 1, month: 1, year: 0, hour: 0, minute: 0, second: 0 };

    /// Decode the chip's BCD time and date tuples.
    pub const fn from_bcd(time: (u8, u8, u8), date: (u8, u8, u8)) -> Self {
        Self {
            hour: bcd::decode(time.0),
            minute: bcd::decode(time.1),
            second: bcd::decode(time.2),
            day: bcd::decode(date.0),
            month: bcd::decode(date.1),
            year: bcd::decode(date.2),
        }
    }

    pub const fn minutes_since_midnight(&self) -> u16 {
        crate::schedule::minutes_since_midnight(self.hour, self.minute)
    }

    /// Read time, then date, and decode both.
    pub fn read<C: ClockChip>(clock: &mut C) -> Result<Self, C::Error> {
        let time = clock.get_time()?;
        let date = clock.get_date()?;
        Ok(Self::from_bcd(time, date))
    }
}
