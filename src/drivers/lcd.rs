//! 16×2 HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! The backpack maps its eight outputs onto the LCD in 4-bit mode:
//!
//! ```text
//!   P7 P6 P5 P4 │ P3        │ P2 │ P1 │ P0
//!   D7 D6 D5 D4 │ backlight │ EN │ RW │ RS
//! ```
//!
//! Every byte goes out as two nibbles, each latched by an EN pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first cell of line 2.
const LINE2_ADDR: u8 = 0x40;
const COLUMNS: u8 = 16;

/// Map a 1-based linear position onto a DDRAM address.  `None` off-screen.
pub fn ddram_address(position: u8) -> Option<u8> {
    match position {
        1..=16 => Some(position - 1),
        17..=32 => Some(LINE2_ADDR + position - 1 - COLUMNS),
        _ => None,
    }
}

pub struct Lcd1602 {
    address: u8,
    backlight: u8,
}

impl Lcd1602 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            backlight: BACKLIGHT,
        }
    }

    /// Power-on reset into 4-bit, two-line mode with the cursor hidden.
    pub fn init<I: I2c>(&mut self, i2c: &mut I, delay: &mut impl DelayNs) -> Result<(), I::Error> {
        delay.delay_ms(50);
        for _ in 0..3 {
            self.write_nibble(i2c, 0x30, 0)?;
            delay.delay_ms(5);
        }
        self.write_nibble(i2c, 0x20, 0)?;
        self.command(i2c, CMD_FUNCTION_4BIT_2LINE)?;
        self.command(i2c, CMD_DISPLAY_ON)?;
        self.clear(i2c, delay)?;
        self.command(i2c, CMD_ENTRY_INCREMENT)
    }

    pub fn clear<I: I2c>(&mut self, i2c: &mut I, delay: &mut impl DelayNs) -> Result<(), I::Error> {
        self.command(i2c, CMD_CLEAR)?;
        // Clear takes 1.52 ms on the controller.
        delay.delay_us(2000);
        Ok(())
    }

    /// Put `ch` at `position`; characters outside ASCII show as `?`.
    pub fn write_char<I: I2c>(&mut self, i2c: &mut I, position: u8, ch: char) -> Result<(), I::Error> {
        let Some(addr) = ddram_address(position) else {
            return Ok(());
        };
        self.command(i2c, CMD_SET_DDRAM | addr)?;
        let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
        self.write_byte(i2c, byte, RS)
    }

    fn command<I: I2c>(&mut self, i2c: &mut I, cmd: u8) -> Result<(), I::Error> {
        self.write_byte(i2c, cmd, 0)
    }

    fn write_byte<I: I2c>(&mut self, i2c: &mut I, byte: u8, mode: u8) -> Result<(), I::Error> {
        self.write_nibble(i2c, byte & 0xF0, mode)?;
        self.write_nibble(i2c, (byte << 4) & 0xF0, mode)
    }

    fn write_nibble<I: I2c>(&mut self, i2c: &mut I, nibble: u8, mode: u8) -> Result<(), I::Error> {
        let base = nibble | mode | self.backlight;
        i2c.write(self.address, &[base | EN, base])
    }
}
