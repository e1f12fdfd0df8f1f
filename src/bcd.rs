//! Packed binary-coded-decimal helpers.
//!
//! The clock chip and the settings storage both speak packed BCD: one byte,
//! tens digit in the high nibble, units digit in the low nibble. Nibbles are
//! masked, never validated, so a byte such as `0xAB` decodes to a defined but
//! meaningless value.

/// Packed BCD byte to decimal.
#[inline]
pub const fn decode(byte: u8) -> u8 {
    let tens = (byte & 0xF0) >> 4;
    let units = byte & 0x0F;
    tens * 10 + units
}

/// Two ASCII digits (tens first) to a packed BCD byte.
///
/// The ASCII `'0'` offset is removed from each character with wrapping
/// arithmetic; non-digit input is not rejected.
#[inline]
pub const fn encode(digits: [u8; 2]) -> u8 {
    (digits[0].wrapping_sub(b'0') << 4) | digits[1].wrapping_sub(b'0')
}

/// Decimal value (0..=99) to packed BCD.
#[inline]
pub const fn from_decimal(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decimal value (0..=99) as the two ASCII digits `encode` expects.
#[inline]
pub const fn to_digits(value: u8) -> [u8; 2] {
    [b'0' + value / 10, b'0' + value % 10]
}
