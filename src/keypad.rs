//! Keypad collaborator and a 4x3 matrix scanner.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::Error;

/// Non-blocking keypad: one poll, at most one key.
pub trait Keypad {
    type Error;

    fn read_key(&mut self) -> Result<Option<char>, Self::Error>;
}

impl<T: Keypad> Keypad for &mut T {
    type Error = T::Error;

    fn read_key(&mut self) -> Result<Option<char>, Self::Error> {
        T::read_key(self)
    }
}

pub const LAYOUT: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

/// Rows are driven low one at a time; columns have pull-ups and read low
/// when a key joins them to the driven row.
///
/// A key is reported once per press: holding it returns `None` until it is
/// released and pressed again.
pub struct MatrixKeypad<R, C> {
    rows: [R; 4],
    cols: [C; 3],
    held: Option<char>,
}

impl<R, C> MatrixKeypad<R, C>
where
    R: OutputPin,
    C: InputPin,
{
    pub fn new(mut rows: [R; 4], cols: [C; 3]) -> Result<Self, Error> {
        for row in rows.iter_mut() {
            row.set_high().map_err(|_| Error::Keypad)?;
        }
        Ok(Self { rows, cols, held: None })
    }

    fn scan(&mut self) -> Result<Option<char>, Error> {
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low().map_err(|_| Error::Keypad)?;
            let mut found = None;
            for (c, col) in self.cols.iter_mut().enumerate() {
                if col.is_low().map_err(|_| Error::Keypad)? {
                    found = Some(LAYOUT[r][c]);
                    break;
                }
            }
            row.set_high().map_err(|_| Error::Keypad)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

impl<R, C> Keypad for MatrixKeypad<R, C>
where
    R: OutputPin,
    C: InputPin,
{
    type Error = Error;

    fn read_key(&mut self) -> Result<Option<char>, Error> {
        let pressed = self.scan()?;
        let fresh = match pressed {
            Some(key) if self.held != Some(key) => Some(key),
            _ => None,
        };
        self.held = pressed;
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::ErrorType;

    use super::*;

    // Which (row, col) is pressed, shared by all pins of one fake matrix
    struct Matrix {
        pressed: Cell<Option<(usize, usize)>>,
        driven: Cell<Option<usize>>,
    }

    struct RowPin<'a> {
        matrix: &'a Matrix,
        index: usize,
    }

    struct ColPin<'a> {
        matrix: &'a Matrix,
        index: usize,
    }

    impl ErrorType for RowPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for RowPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.matrix.driven.set(Some(self.index));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.matrix.driven.get() == Some(self.index) {
                self.matrix.driven.set(None);
            }
            Ok(())
        }
    }

    impl ErrorType for ColPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for ColPin<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_low()?)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            let hit = match (self.matrix.pressed.get(), self.matrix.driven.get()) {
                (Some((r, c)), Some(driven)) => r == driven && c == self.index,
                _ => false,
            };
            Ok(hit)
        }
    }

    fn keypad(matrix: &Matrix) -> MatrixKeypad<RowPin<'_>, ColPin<'_>> {
        let rows = [0, 1, 2, 3].map(|index| RowPin { matrix, index });
        let cols = [0, 1, 2].map(|index| ColPin { matrix, index });
        MatrixKeypad::new(rows, cols).unwrap()
    }

    #[test]
    fn reports_each_press_once() {
        let matrix = Matrix { pressed: Cell::new(None), driven: Cell::new(None) };
        let mut kp = keypad(&matrix);

        assert_eq!(kp.read_key().unwrap(), None);
        matrix.pressed.set(Some((3, 1)));
        assert_eq!(kp.read_key().unwrap(), Some('0'));
        assert_eq!(kp.read_key().unwrap(), None);
        matrix.pressed.set(None);
        assert_eq!(kp.read_key().unwrap(), None);
        matrix.pressed.set(Some((3, 1)));
        assert_eq!(kp.read_key().unwrap(), Some('0'));
    }

    #[test]
    fn maps_layout_positions() {
        let matrix = Matrix { pressed: Cell::new(Some((3, 0))), driven: Cell::new(None) };
        let mut kp = keypad(&matrix);
        assert_eq!(kp.read_key().unwrap(), Some('*'));
        matrix.pressed.set(Some((1, 2)));
        assert_eq!(kp.read_key().unwrap(), Some('6'));
        assert_eq!(matrix.driven.get(), None);
    }
}
