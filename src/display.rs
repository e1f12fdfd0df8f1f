//! 16x2 character display: the collaborator trait, screen positions and the
//! text fields the status screen is built from.

use core::fmt::Write;

use heapless::String;

pub const COLUMNS: u8 = 16;
pub const ROWS: u8 = 2;
pub const DEGREE: char = '°';

// (column, row) of each status field
pub const DATE_AT: (u8, u8) = (0, 0);
pub const TEMPERATURE_AT: (u8, u8) = (6, 0);
pub const SETPOINT_AT: (u8, u8) = (11, 0);
pub const TIME_AT: (u8, u8) = (0, 1);
pub const SCHEDULE_AT: (u8, u8) = (7, 1);

/// Character display with a cursor.
///
/// `put_char` writes at the cursor and advances it. Drivers that buffer may
/// defer the transfer to `flush`.
pub trait CharDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn goto(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;
    fn put_char(&mut self, c: char) -> Result<(), Self::Error>;

    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for c in s.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: CharDisplay> CharDisplay for &mut T {
    type Error = T::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }

    fn goto(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        T::goto(self, col, row)
    }

    fn put_char(&mut self, c: char) -> Result<(), Self::Error> {
        T::put_char(self, c)
    }

    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        T::put_str(self, s)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

/// Write `text` starting at `at`.
pub fn write_at<D: CharDisplay>(display: &mut D, at: (u8, u8), text: &str) -> Result<(), D::Error> {
    display.goto(at.0, at.1)?;
    display.put_str(text)
}

/// `DD/MM`
pub fn date_text(day: u8, month: u8) -> String<5> {
    let mut s = String::new();
    let _ = write!(s, "{:02}/{:02}", day, month);
    s
}

/// `HH:MM`
pub fn time_text(hour: u8, minute: u8) -> String<5> {
    let mut s = String::new();
    let _ = write!(s, "{:02}:{:02}", hour, minute);
    s
}

/// `N°C`, padded to four cells so a shorter value overwrites a longer one.
pub fn temperature_text(degrees: i16) -> String<8> {
    let mut s = String::new();
    let _ = write!(s, "{}{}C", degrees, DEGREE);
    while s.chars().count() < 4 {
        let _ = s.push(' ');
    }
    s
}

/// `>N°C`
pub fn setpoint_text(degrees: u8) -> String<8> {
    let mut s = String::new();
    let _ = write!(s, ">{}{}C", degrees, DEGREE);
    s
}

/// `ON  HH:MM` or `OFF HH:MM`
pub fn schedule_text(on: bool, hour: u8, minute: u8) -> String<9> {
    let mut s = String::new();
    let label = if on { "ON " } else { "OFF" };
    let _ = write!(s, "{} {:02}:{:02}", label, hour, minute);
    s
}
