//! Error type for collaborator failures.
//!
//! Input mistakes are not errors: out-of-range entries are re-prompted and
//! an idle operator abandons the screen through the timeout. What remains is
//! a bus or device failure, named after the collaborator that reported it.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Character display write failed
    Display,
    /// Keypad scan failed
    Keypad,
    /// Clock chip read or write failed
    Clock,
    /// Settings storage read or write failed
    Storage,
    /// Analog sample failed
    Sensor,
    /// Heater output could not be driven
    Heater,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Error::Display => "display error",
            Error::Keypad => "keypad error",
            Error::Clock => "clock chip error",
            Error::Storage => "storage error",
            Error::Sensor => "sensor error",
            Error::Heater => "heater output error",
        };
        f.write_str(label)
    }
}
