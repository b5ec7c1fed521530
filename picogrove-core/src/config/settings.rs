//! Runtime-tunable settings
//!
//! Everything the command server needs to know that is not board wiring:
//! link speeds, PWM carrier, ranging timeout and the display fitted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB backlight controller fitted to the character display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BacklightKind {
    /// Monochrome display, colour requests are ignored
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    Absent,
    /// NXP PCA9633 (Grove LCD RGB Backlight up to v4)
    #[default]
    Pca9633,
    /// SGM31323 (Grove LCD RGB Backlight v5)
    Sgm31323,
}

/// Character display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplaySettings {
    /// Whether a display driver is available at all
    pub enabled: bool,
    /// Backlight controller variant
    pub backlight: BacklightKind,
}

impl DisplaySettings {
    pub const DEFAULT: Self = Self {
        enabled: true,
        backlight: BacklightKind::Pca9633,
    };
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Command server settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Host link baud rate
    pub serial_baudrate: u32,
    /// I2C clock for the display buses
    pub i2c_frequency_hz: u32,
    /// PWM carrier for `analogWrite`
    pub pwm_frequency_hz: u32,
    /// Echo timeout for `ultrasonicRead`
    pub ranging_timeout_us: u32,
    /// Display options
    pub display: DisplaySettings,
}

/// Settings rejected by [`Settings::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate is zero
    SerialBaudrate,
    /// I2C clock outside 10 kHz - 1 MHz
    I2cFrequency,
    /// PWM carrier outside 8 Hz - 1 MHz
    PwmFrequency,
    /// Ranging timeout outside 1 us - 1 s
    RangingTimeout,
}

impl ConfigError {
    /// Setting name as written in the configuration file
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::SerialBaudrate => "serial_baudrate",
            ConfigError::I2cFrequency => "i2c_frequency_hz",
            ConfigError::PwmFrequency => "pwm_frequency_hz",
            ConfigError::RangingTimeout => "ranging_timeout_us",
        }
    }
}

impl Settings {
    pub const PWM_FREQUENCY_RANGE: core::ops::RangeInclusive<u32> = 8..=1_000_000;
    pub const I2C_FREQUENCY_RANGE: core::ops::RangeInclusive<u32> = 10_000..=1_000_000;
    pub const RANGING_TIMEOUT_RANGE: core::ops::RangeInclusive<u32> = 1..=1_000_000;

    /// Defaults matching the Grove Shield for Pi Pico
    pub const DEFAULT: Self = Self {
        serial_baudrate: 115_200,
        i2c_frequency_hz: 400_000,
        pwm_frequency_hz: 1_000,
        ranging_timeout_us: 30_000,
        display: DisplaySettings::DEFAULT,
    };

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_baudrate == 0 {
            return Err(ConfigError::SerialBaudrate);
        }
        if !Self::I2C_FREQUENCY_RANGE.contains(&self.i2c_frequency_hz) {
            return Err(ConfigError::I2cFrequency);
        }
        if !Self::PWM_FREQUENCY_RANGE.contains(&self.pwm_frequency_hz) {
            return Err(ConfigError::PwmFrequency);
        }
        if !Self::RANGING_TIMEOUT_RANGE.contains(&self.ranging_timeout_us) {
            return Err(ConfigError::RangingTimeout);
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
