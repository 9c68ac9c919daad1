//! 16x2 HD44780 character LCD behind a PCF8574 I2C backpack.
//!
//! The expander drives the controller in 4-bit mode:
//!
//! | PCF8574 bit | P0 | P1 | P2 | P3        | P4..P7 |
//! |-------------|----|----|----|-----------|--------|
//! | LCD line    | RS | RW | EN | backlight | D4..D7 |
//!
//! RW is tied low (write only), so the busy flag is never polled; fixed
//! delays cover every instruction instead.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

pub const ADDRESS: u8 = 0x27;
pub const COLS: u8 = 16;
pub const ROWS: u8 = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Lcd {
    address: u8,
    backlight: bool,
}

impl Lcd {
    pub fn new(address: u8) -> Self {
        Self { address, backlight: true }
    }

    /// Power-on reset by instruction, then 4-bit, two lines, display on,
    /// cleared.
    pub fn init<I: I2c>(&mut self, i2c: &mut I, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        delay.delay_ms(50);
        self.expander(i2c, 0)?;

        // Three 8-bit function sets, then switch to 4-bit
        for wait_us in [4_500, 4_500, 150] {
            self.pulse(i2c, 0x30, delay)?;
            delay.delay_us(wait_us);
        }
        self.pulse(i2c, 0x20, delay)?;
        delay.delay_us(150);

        self.command(i2c, CMD_FUNCTION_4BIT_2LINE, delay)?;
        self.command(i2c, CMD_DISPLAY_ON, delay)?;
        self.clear(i2c, delay)?;
        self.command(i2c, CMD_ENTRY_INCREMENT, delay)
    }

    pub fn clear<I: I2c>(&mut self, i2c: &mut I, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        self.command(i2c, CMD_CLEAR, delay)?;
        delay.delay_ms(2);
        Ok(())
    }

    pub fn set_cursor<I: I2c>(
        &mut self,
        i2c: &mut I,
        row: u8,
        col: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), ErrorKind> {
        let offset = ROW_OFFSETS[usize::from(row.min(ROWS - 1))];
        self.command(i2c, CMD_SET_DDRAM | (offset + col.min(COLS - 1)), delay)
    }

    /// Write `text` from (`row`, `col`); anything past the last column is
    /// dropped. Rows past the panel are ignored.
    pub fn print_at<I: I2c>(
        &mut self,
        i2c: &mut I,
        row: u8,
        col: u8,
        text: &str,
        delay: &mut impl DelayNs,
    ) -> Result<(), ErrorKind> {
        if row >= ROWS || col >= COLS {
            return Ok(());
        }
        self.set_cursor(i2c, row, col, delay)?;
        let room = usize::from(COLS - col);
        for b in text.bytes().take(room) {
            self.data(i2c, to_rom_char(b), delay)?;
        }
        Ok(())
    }

    pub fn set_backlight<I: I2c>(&mut self, i2c: &mut I, on: bool) -> Result<(), ErrorKind> {
        self.backlight = on;
        self.expander(i2c, 0)
    }

    // ── Internal ──────────────────────────────────────────────

    fn command<I: I2c>(&mut self, i2c: &mut I, cmd: u8, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        self.send(i2c, cmd, 0, delay)
    }

    fn data<I: I2c>(&mut self, i2c: &mut I, byte: u8, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        self.send(i2c, byte, RS, delay)
    }

    fn send<I: I2c>(&mut self, i2c: &mut I, byte: u8, mode: u8, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        self.pulse(i2c, (byte & 0xF0) | mode, delay)?;
        self.pulse(i2c, ((byte << 4) & 0xF0) | mode, delay)?;
        delay.delay_us(40);
        Ok(())
    }

    /// Latch one nibble (already in the upper four bits) on EN's falling edge.
    fn pulse<I: I2c>(&mut self, i2c: &mut I, bits: u8, delay: &mut impl DelayNs) -> Result<(), ErrorKind> {
        self.expander(i2c, bits | EN)?;
        delay.delay_us(1);
        self.expander(i2c, bits)
    }

    fn expander<I: I2c>(&mut self, i2c: &mut I, bits: u8) -> Result<(), ErrorKind> {
        let bl = if self.backlight { BACKLIGHT } else { 0 };
        i2c.write(self.address, &[bits | bl]).map_err(|e| e.kind())
    }
}

/// The HD44780 A00 ROM matches ASCII for printable characters; anything
/// else is shown as a space.
fn to_rom_char(b: u8) -> u8 {
    if (0x20..0x7E).contains(&b) { b } else { b' ' }
}
