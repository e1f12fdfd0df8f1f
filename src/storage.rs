//! Non-volatile settings: five single-byte slots, each a packed-BCD value.

use crate::bcd;
use crate::schedule::Schedule;
use crate::{
    DEFAULT_HOUR_OFF, DEFAULT_HOUR_ON, DEFAULT_MINUTE_OFF, DEFAULT_MINUTE_ON, DEFAULT_SETPOINT,
    MAX_SETPOINT, MIN_SETPOINT,
};

/// Byte-addressed non-volatile storage.
pub trait ByteStorage {
    type Error;

    fn read_byte(&mut self, slot: u8) -> Result<u8, Self::Error>;
    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: ByteStorage> ByteStorage for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self, slot: u8) -> Result<u8, Self::Error> {
        T::read_byte(self, slot)
    }

    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Self::Error> {
        T::write_byte(self, slot, value)
    }
}

pub mod slot {
    pub const SETPOINT: u8 = 0;
    pub const HOUR_ON: u8 = 1;
    pub const MINUTE_ON: u8 = 2;
    pub const HOUR_OFF: u8 = 3;
    pub const MINUTE_OFF: u8 = 4;
}

pub const fn setpoint_in_range(degrees: u8) -> bool {
    degrees >= MIN_SETPOINT && degrees <= MAX_SETPOINT
}

/// Decoded contents of the five slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub setpoint: u8,
    pub schedule: Schedule,
}

impl Settings {
    pub const FACTORY: Self = Self {
        setpoint: DEFAULT_SETPOINT,
        schedule: Schedule::new(
            DEFAULT_HOUR_ON,
            DEFAULT_MINUTE_ON,
            DEFAULT_HOUR_OFF,
            DEFAULT_MINUTE_OFF,
        ),
    };

    pub fn load<S: ByteStorage>(storage: &mut S) -> Result<Self, S::Error> {
        let setpoint = bcd::decode(storage.read_byte(slot::SETPOINT)?);
        let schedule = Schedule::new(
            bcd::decode(storage.read_byte(slot::HOUR_ON)?),
            bcd::decode(storage.read_byte(slot::MINUTE_ON)?),
            bcd::decode(storage.read_byte(slot::HOUR_OFF)?),
            bcd::decode(storage.read_byte(slot::MINUTE_OFF)?),
        );
        Ok(Self { setpoint, schedule })
    }

    /// Erased storage reads `0xFF` everywhere, which fails here.
    pub const fn is_valid(&self) -> bool {
        setpoint_in_range(self.setpoint) && self.schedule.is_valid()
    }

    pub fn store<S: ByteStorage>(&self, storage: &mut S) -> Result<(), S::Error> {
        store_setpoint(storage, self.setpoint)?;
        store_schedule(storage, &self.schedule)
    }
}

pub fn store_setpoint<S: ByteStorage>(storage: &mut S, degrees: u8) -> Result<(), S::Error> {
    storage.write_byte(slot::SETPOINT, bcd::from_decimal(degrees))
}

pub fn store_schedule<S: ByteStorage>(storage: &mut S, schedule: &Schedule) -> Result<(), S::Error> {
    storage.write_byte(slot::HOUR_ON, bcd::from_decimal(schedule.hour_on))?;
    storage.write_byte(slot::MINUTE_ON, bcd::from_decimal(schedule.minute_on))?;
    storage.write_byte(slot::HOUR_OFF, bcd::from_decimal(schedule.hour_off))?;
    storage.write_byte(slot::MINUTE_OFF, bcd::from_decimal(schedule.minute_off))
}
