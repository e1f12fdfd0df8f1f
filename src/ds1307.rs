//! DS1307 real-time clock over I2C, exposed as a [`ClockChip`].
//!
//! Registers are already packed BCD, so values pass through with only the
//! control bits masked off. Always runs in 24-hour mode.

use embedded_hal::i2c::I2c;

use crate::rtc::ClockChip;
use crate::Error;

pub const DS1307_ADDRESS: u8 = 0x68;

#[allow(dead_code)]
mod reg {
    pub const SECONDS: u8 = 0x00; // bit 7: clock halt
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02; // bit 6: 12-hour mode
    pub const WEEKDAY: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const CONTROL: u8 = 0x07;
}

const CLOCK_HALT: u8 = 0x80;

pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }
}

impl<I2C: I2c> ClockChip for Ds1307<I2C> {
    type Error = Error;

    fn get_time(&mut self) -> Result<(u8, u8, u8), Error> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut buf)
            .map_err(|_| Error::Clock)?;
        Ok((buf[2] & 0x3F, buf[1] & 0x7F, buf[0] & !CLOCK_HALT))
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Error> {
        // Clearing the halt bit also restarts a stopped oscillator
        let payload = [reg::SECONDS, second & !CLOCK_HALT, minute & 0x7F, hour & 0x3F];
        self.i2c.write(DS1307_ADDRESS, &payload).map_err(|_| Error::Clock)
    }

    fn get_date(&mut self) -> Result<(u8, u8, u8), Error> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::DATE], &mut buf)
            .map_err(|_| Error::Clock)?;
        Ok((buf[0] & 0x3F, buf[1] & 0x1F, buf[2]))
    }

    fn set_date(&mut self, day: u8, month: u8, year: u8) -> Result<(), Error> {
        let payload = [reg::DATE, day & 0x3F, month & 0x1F, year];
        self.i2c.write(DS1307_ADDRESS, &payload).map_err(|_| Error::Clock)
    }
}
