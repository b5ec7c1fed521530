//! Character display traits for the Grove LCD

use picogrove_protocol::BusId;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// No display driver for this bus; will not become available
    Unavailable,
    /// Bus transfer failed
    Bus,
    /// Colour component outside 0-255
    InvalidColor,
}

/// RGB backlight of a character display
pub trait RgbBacklight {
    /// Set the backlight colour
    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<(), DisplayError>;
}

/// Trait for HD44780-style character displays
pub trait CharacterDisplay {
    /// Clear the screen and return the cursor home
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor to the first column of the first row
    fn home(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `col`: Column (0-15)
    /// - `row`: Row (0-1)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Write text at the cursor
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Colour backlight, if the display has one
    fn backlight(&mut self) -> Option<&mut dyn RgbBacklight> {
        None
    }
}

/// Opens the display attached to an I2C bus
pub trait DisplayProvider {
    /// Display type handed out by this provider
    type Display: CharacterDisplay;

    /// Initialize the display on `bus`
    ///
    /// Return [`DisplayError::Unavailable`] when there is no driver for the
    /// bus at all; any other error is treated as transient.
    fn open(&mut self, bus: BusId) -> Result<Self::Display, DisplayError>;
}
