//! SH1107 128x64 OLED driven as a 16x2 character display.
//!
//! Glyphs are drawn into a local frame buffer with embedded-graphics; `flush`
//! pushes the whole buffer over the display interface.

use core::convert::Infallible;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_graphics::mono_font::{iso_8859_1::FONT_8X13, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::display::{CharDisplay, COLUMNS, ROWS};

const WIDTH: u8 = 128;
const HEIGHT: u8 = 64;
const BUFFER_SIZE: usize = (WIDTH as usize * HEIGHT as usize) / 8;
const STRIP_LEN: usize = WIDTH as usize / 8;

const CELL_WIDTH: i32 = 8;
const ROW_HEIGHT: i32 = HEIGHT as i32 / ROWS as i32;
const GLYPH_HEIGHT: i32 = 13;
const GLYPH_TOP: i32 = (ROW_HEIGHT - GLYPH_HEIGHT) / 2;

pub struct Sh1107<DI, RESET> {
    interface: DI,
    rst: RESET,
    buffer: [u8; BUFFER_SIZE],
    cursor: (u8, u8),
}

impl<DI, RESET> Sh1107<DI, RESET>
where
    DI: WriteOnlyDataCommand,
    RESET: OutputPin<Error = Infallible>,
{
    pub fn new(interface: DI, rst: RESET) -> Self {
        Self {
            interface,
            rst,
            buffer: [0; BUFFER_SIZE],
            cursor: (0, 0),
        }
    }

    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.reset(delay)?;
        self.off()?;
        self.send_commands(&[0x00])?; // Set lower column address
        self.send_commands(&[0x10])?; // Set higher column address
        self.send_commands(&[0xB0])?; // Set page address
        self.send_commands(&[0xDC, 0x00])?; // Set display start line
        self.send_commands(&[0x81, 0x6F])?; // Set contrast control
        self.send_commands(&[0x21])?; // Vertical addressing mode
        self.send_commands(&[0xA0])?; // Segment remap
        self.send_commands(&[0xC0])?; // Common output scan direction
        self.send_commands(&[0xA4])?; // Entire display on: follow RAM
        self.send_commands(&[0xA6])?; // Normal (not reversed)
        self.send_commands(&[0xA8, 0x3F])?; // Multiplex ratio (height - 1)
        self.send_commands(&[0xD3, 0x60])?; // Display offset
        self.send_commands(&[0xD5, 0x50])?; // Clock divide ratio / oscillator frequency
        self.send_commands(&[0xD9, 0x22])?; // Discharge / precharge period
        self.send_commands(&[0xDB, 0x35])?; // VCOM deselect level
        self.send_commands(&[0xAD, 0x81])?; // DC-DC on
        self.on()?;
        delay.delay_ms(10);
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(1);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xAE])
    }

    pub fn on(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xAF])
    }

    fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(commands))
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_data(DataFormat::U8(data))
    }

    /// Transfer the frame buffer, one 16-byte column strip per page.
    pub fn show(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[0xB0])?;
        for page in 0..HEIGHT {
            let column = (HEIGHT - 1) - page;
            self.send_commands(&[column & 0x0F])?;
            self.send_commands(&[0x10 + (column >> 4)])?;
            let start = page as usize * STRIP_LEN;
            let mut strip = [0u8; STRIP_LEN];
            strip.copy_from_slice(&self.buffer[start..start + STRIP_LEN]);
            self.send_data(&strip)?;
        }
        Ok(())
    }

    fn cell(col: u8, row: u8) -> Rectangle {
        Rectangle::new(
            Point::new(col as i32 * CELL_WIDTH, row as i32 * ROW_HEIGHT),
            Size::new(CELL_WIDTH as u32, ROW_HEIGHT as u32),
        )
    }

    fn draw_glyph(&mut self, c: char, col: u8, row: u8) -> Result<(), DisplayError> {
        let area = Self::cell(col, row);
        area.into_styled(PrimitiveStyle::with_fill(BinaryColor::Off)).draw(self)?;

        let mut utf8 = [0u8; 4];
        let glyph = c.encode_utf8(&mut utf8);
        let origin = area.top_left + Point::new(0, GLYPH_TOP);
        let style = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
        Text::with_baseline(glyph, origin, style, Baseline::Top).draw(self)?;
        Ok(())
    }

    #[cfg(test)]
    fn pixel(&self, x: u8, y: u8) -> bool {
        let index = (y as usize * WIDTH as usize + x as usize) / 8;
        self.buffer[index] & (1 << (x % 8)) != 0
    }
}

impl<DI, RESET> CharDisplay for Sh1107<DI, RESET>
where
    DI: WriteOnlyDataCommand,
    RESET: OutputPin<Error = Infallible>,
{
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0x00);
        self.cursor = (0, 0);
        Ok(())
    }

    fn goto(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if col >= COLUMNS || row >= ROWS {
            return Err(DisplayError::OutOfBoundsError);
        }
        self.cursor = (col, row);
        Ok(())
    }

    /// Characters past the end of a row are dropped.
    fn put_char(&mut self, c: char) -> Result<(), DisplayError> {
        let (col, row) = self.cursor;
        if col < COLUMNS {
            self.draw_glyph(c, col, row)?;
            self.cursor = (col + 1, row);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.show()
    }
}

impl<DI, RESET> DrawTarget for Sh1107<DI, RESET> {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, colour) in pixels {
            let (x, y) = (coord.x, coord.y);
            if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
                let index = (y as usize * WIDTH as usize + x as usize) / 8;
                if colour == BinaryColor::On {
                    self.buffer[index] |= 1 << (x % 8);
                } else {
                    self.buffer[index] &= !(1 << (x % 8));
                }
            }
        }
        Ok(())
    }
}

impl<DI, RESET> OriginDimensions for Sh1107<DI, RESET> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
