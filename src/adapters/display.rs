//! Character display adapter.
//!
//! [`Lcd1602`] drives a 16x2 HD44780 character LCD through a PCF8574 I2C
//! backpack in 4-bit mode.
//!
//! PCF8574 bit map: P0=RS, P1=RW, P2=EN, P3=backlight, P4..P7=D4..D7.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::DisplayPort;
use crate::menu::render::{COLS, Frame, ROWS};
use crate::pins::LCD_I2C_ADDR;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 lines, 5x8
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    failed: bool,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: LCD_I2C_ADDR,
            failed: false,
        }
    }

    /// Power-on initialisation into 4-bit mode.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.delay.delay_ms(50);
        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20, 0)?;
        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.command(CMD_ENTRY_MODE)?;
        debug!("LCD: initialised at 0x{:02x}", self.address);
        Ok(())
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_nibble(&mut self, high_bits: u8, mode: u8) -> Result<(), I2C::Error> {
        let byte = (high_bits & 0xF0) | mode | BACKLIGHT;
        self.i2c.write(self.address, &[byte | EN])?;
        self.delay.delay_us(1);
        self.i2c.write(self.address, &[byte])?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), I2C::Error> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.send(cmd, 0)
    }

    fn write_row(&mut self, row: usize, text: &str) -> Result<(), I2C::Error> {
        self.command(CMD_SET_DDRAM | ROW_OFFSETS[row])?;
        for b in text.bytes().take(COLS) {
            self.send(b, RS)?;
        }
        Ok(())
    }

    /// Log the first failure of a run of failures only.
    fn report(&mut self, result: Result<(), I2C::Error>, what: &str) {
        match result {
            Ok(()) => self.failed = false,
            Err(_) if !self.failed => {
                warn!("LCD: {} failed", what);
                self.failed = true;
            }
            Err(_) => {}
        }
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for Lcd1602<I2C, D> {
    fn clear(&mut self) {
        let r = self.command(CMD_CLEAR).map(|()| self.delay.delay_ms(2));
        self.report(r, "clear");
    }

    fn draw(&mut self, frame: &Frame) {
        let r = (0..ROWS).try_for_each(|row| self.write_row(row, frame.row_str(row)));
        self.report(r, "draw");
    }
}
