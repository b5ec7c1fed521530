//! JHD1313 16x2 character LCD with RGB backlight (Grove LCD RGB Backlight)
//!
//! The module carries two I2C devices on the same bus:
//!
//! - An HD44780-compatible LCD controller at `0x3E`. Every transfer is a
//!   control byte (`0x80` command, `0x40` data) followed by one byte.
//! - An RGB backlight controller. Modules up to v4 use a PCA9633 at
//!   `0x62`, v5 modules an SGM31323 at `0x30`. Both take plain
//!   `[register, value]` writes.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use picogrove_core::config::BacklightKind;
use picogrove_core::traits::{CharacterDisplay, DisplayError, RgbBacklight};

/// LCD controller address
pub const LCD_ADDRESS: u8 = 0x3E;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x80;
const CONTROL_DATA: u8 = 0x40;

/// HD44780 instructions and flags
pub mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    /// Entry mode: cursor moves right
    pub const ENTRY_LEFT: u8 = 0x02;
    /// Display control: display on, cursor and blink off
    pub const DISPLAY_ON: u8 = 0x04;
    /// Function set: two lines, 5x8 font
    pub const TWO_LINE: u8 = 0x08;

    /// DDRAM address of the second row
    pub const ROW2_OFFSET: u8 = 0x40;
}

/// PCA9633 backlight controller (modules up to v4)
pub mod pca9633 {
    pub const ADDRESS: u8 = 0x62;
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    pub const PWM_BLUE: u8 = 0x02;
    pub const PWM_GREEN: u8 = 0x03;
    pub const PWM_RED: u8 = 0x04;
    pub const LEDOUT: u8 = 0x08;
}

/// SGM31323 backlight controller (v5 modules)
pub mod sgm31323 {
    pub const ADDRESS: u8 = 0x30;
    pub const RESET: u8 = 0x00;
    pub const LED_MODE: u8 = 0x04;
    pub const PWM_RED: u8 = 0x06;
    pub const PWM_GREEN: u8 = 0x07;
    pub const PWM_BLUE: u8 = 0x08;
}

/// Character ROM code for `ch`
///
/// Printable ASCII maps to itself and half-width katakana to the A1-DF
/// range of the A00 ROM. Everything else is shown as `?`.
pub fn glyph_code(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{FF61}'..='\u{FF9F}' => (ch as u32 - 0xFF61 + 0xA1) as u8,
        _ => b'?',
    }
}

/// Grove LCD RGB Backlight on one I2C bus
pub struct Jhd1313<I, D> {
    i2c: I,
    delay: D,
    backlight: BacklightKind,
}

impl<I: I2c, D: DelayNs> Jhd1313<I, D> {
    /// Create a driver; call [`init`](Self::init) before use
    ///
    /// # Arguments
    /// - `i2c`: Bus the module is plugged into
    /// - `delay`: Delay for controller timing
    /// - `backlight`: Backlight controller fitted to the module
    pub fn new(i2c: I, delay: D, backlight: BacklightKind) -> Self {
        Self {
            i2c,
            delay,
            backlight,
        }
    }

    /// Give back the bus
    pub fn release(self) -> I {
        self.i2c
    }

    /// Run the power-on sequence and turn the backlight white
    pub fn init(&mut self) -> Result<(), DisplayError> {
        // Controller needs >40 ms after power-up
        self.delay.delay_ms(50);

        let function_set = cmd::FUNCTION_SET | cmd::TWO_LINE;
        self.command(function_set)?;
        self.delay.delay_us(4500);
        self.command(function_set)?;
        self.delay.delay_us(150);
        self.command(function_set)?;

        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE_SET | cmd::ENTRY_LEFT)?;

        match self.backlight {
            BacklightKind::Absent => {}
            BacklightKind::Pca9633 => {
                self.set_reg(pca9633::ADDRESS, pca9633::MODE1, 0x00)?;
                // All outputs under individual PWM control
                self.set_reg(pca9633::ADDRESS, pca9633::LEDOUT, 0xFF)?;
                // Group control set to blinking
                self.set_reg(pca9633::ADDRESS, pca9633::MODE2, 0x20)?;
            }
            BacklightKind::Sgm31323 => {
                self.set_reg(sgm31323::ADDRESS, sgm31323::RESET, 0x07)?;
                self.delay.delay_us(200);
                // Every channel always on
                self.set_reg(sgm31323::ADDRESS, sgm31323::LED_MODE, 0x15)?;
            }
        }
        if self.backlight != BacklightKind::Absent {
            self.set_rgb(255, 255, 255)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("JHD1313 initialised, backlight {}", self.backlight);

        Ok(())
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_COMMAND, value])
            .map_err(|_| DisplayError::Bus)
    }

    fn data(&mut self, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_DATA, value])
            .map_err(|_| DisplayError::Bus)
    }

    fn set_reg(&mut self, address: u8, reg: u8, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(address, &[reg, value])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I: I2c, D: DelayNs> CharacterDisplay for Jhd1313<I, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR_DISPLAY)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::RETURN_HOME)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let offset = if row == 0 { 0 } else { cmd::ROW2_OFFSET };
        self.command(cmd::SET_DDRAM_ADDR | (col.min(0x27) + offset))
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for ch in text.chars() {
            self.data(glyph_code(ch))?;
        }
        Ok(())
    }

    fn backlight(&mut self) -> Option<&mut dyn RgbBacklight> {
        match self.backlight {
            BacklightKind::Absent => None,
            _ => Some(self),
        }
    }
}

impl<I: I2c, D: DelayNs> RgbBacklight for Jhd1313<I, D> {
    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<(), DisplayError> {
        match self.backlight {
            BacklightKind::Absent => Ok(()),
            BacklightKind::Pca9633 => {
                self.set_reg(pca9633::ADDRESS, pca9633::PWM_RED, red)?;
                self.set_reg(pca9633::ADDRESS, pca9633::PWM_GREEN, green)?;
                self.set_reg(pca9633::ADDRESS, pca9633::PWM_BLUE, blue)
            }
            BacklightKind::Sgm31323 => {
                self.set_reg(sgm31323::ADDRESS, sgm31323::PWM_RED, red)?;
                self.set_reg(sgm31323::ADDRESS, sgm31323::PWM_GREEN, green)?;
                self.set_reg(sgm31323::ADDRESS, sgm31323::PWM_BLUE, blue)
            }
        }
    }
}
