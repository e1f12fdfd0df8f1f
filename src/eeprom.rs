//! 24Cxx serial EEPROM over I2C, exposed as [`ByteStorage`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::storage::ByteStorage;
use crate::Error;

pub const AT24C_ADDRESS: u8 = 0x50;

const WRITE_CYCLE_MS: u32 = 5; // Internal write time after a byte write

pub struct At24c<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> At24c<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay, address: AT24C_ADDRESS }
    }
}

impl<I2C: I2c, D: DelayNs> ByteStorage for At24c<I2C, D> {
    type Error = Error;

    fn read_byte(&mut self, slot: u8) -> Result<u8, Error> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[slot], &mut value)
            .map_err(|_| Error::Storage)?;
        Ok(value[0])
    }

    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Error> {
        self.i2c.write(self.address, &[slot, value]).map_err(|_| Error::Storage)?;
        self.delay.delay_ms(WRITE_CYCLE_MS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    use super::*;
    use crate::storage::Settings;

    struct Rom {
        cells: [u8; 16],
        ptr: usize,
    }

    impl ErrorType for Rom {
        type Error = ErrorKind;
    }

    impl I2c for Rom {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            if address != AT24C_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((first, rest)) = bytes.split_first() {
                            self.ptr = *first as usize;
                            for b in rest {
                                self.cells[self.ptr] = *b;
                                self.ptr += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.cells[self.ptr];
                            self.ptr += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn settings_survive_the_bus() {
        let rom = Rom { cells: [0xFF; 16], ptr: 0 };
        let mut eeprom = At24c::new(rom, CountingDelay::default());
        assert!(!Settings::load(&mut eeprom).unwrap().is_valid());

        Settings::FACTORY.store(&mut eeprom).unwrap();
        assert_eq!(Settings::load(&mut eeprom).unwrap(), Settings::FACTORY);
        // one write cycle per slot
        assert_eq!(eeprom.delay.total_ns, 5 * 5_000_000);
    }

    #[test]
    fn wrong_address_is_a_storage_error() {
        let rom = Rom { cells: [0; 16], ptr: 0 };
        // A0..A2 strapped high
        let mut eeprom = At24c { i2c: rom, delay: CountingDelay::default(), address: 0x57 };
        assert_eq!(eeprom.read_byte(0), Err(Error::Storage));
    }
}
