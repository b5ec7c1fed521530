//! Display provider for the two Grove I2C ports
//!
//! Each port's bus is handed over at startup and claimed by the display
//! the first time that port is used. The two buses may be different types.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use picogrove_core::config::BacklightKind;
use picogrove_core::traits::{CharacterDisplay, DisplayError, DisplayProvider, RgbBacklight};
use picogrove_protocol::BusId;

use super::jhd1313::Jhd1313;

/// Display opened on one of the two ports
pub enum GroveLcd<I0, I1, D> {
    I2c0(Jhd1313<I0, D>),
    I2c1(Jhd1313<I1, D>),
}

impl<I0, I1, D> CharacterDisplay for GroveLcd<I0, I1, D>
where
    I0: I2c,
    I1: I2c,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        match self {
            GroveLcd::I2c0(lcd) => lcd.clear(),
            GroveLcd::I2c1(lcd) => lcd.clear(),
        }
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        match self {
            GroveLcd::I2c0(lcd) => lcd.home(),
            GroveLcd::I2c1(lcd) => lcd.home(),
        }
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        match self {
            GroveLcd::I2c0(lcd) => lcd.set_cursor(col, row),
            GroveLcd::I2c1(lcd) => lcd.set_cursor(col, row),
        }
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        match self {
            GroveLcd::I2c0(lcd) => lcd.write_str(text),
            GroveLcd::I2c1(lcd) => lcd.write_str(text),
        }
    }

    fn backlight(&mut self) -> Option<&mut dyn RgbBacklight> {
        match self {
            GroveLcd::I2c0(lcd) => lcd.backlight(),
            GroveLcd::I2c1(lcd) => lcd.backlight(),
        }
    }
}

/// Opens a [`Jhd1313`] on whichever port is asked for
pub struct GroveLcdProvider<I0, I1, D> {
    bus0: Option<I0>,
    bus1: Option<I1>,
    delay: D,
    backlight: BacklightKind,
}

impl<I0, I1, D> GroveLcdProvider<I0, I1, D>
where
    I0: I2c,
    I1: I2c,
    D: DelayNs + Clone,
{
    /// # Arguments
    /// - `bus0`: Bus behind port I2C0, `None` if not wired
    /// - `bus1`: Bus behind port I2C1, `None` if not wired
    /// - `delay`: Delay cloned into each display
    /// - `backlight`: Backlight controller fitted to the modules
    pub fn new(bus0: Option<I0>, bus1: Option<I1>, delay: D, backlight: BacklightKind) -> Self {
        Self {
            bus0,
            bus1,
            delay,
            backlight,
        }
    }
}

impl<I0, I1, D> DisplayProvider for GroveLcdProvider<I0, I1, D>
where
    I0: I2c,
    I1: I2c,
    D: DelayNs + Clone,
{
    type Display = GroveLcd<I0, I1, D>;

    /// Initialise the display on `bus`
    ///
    /// A bus that fails to initialise is kept so the next call can retry.
    fn open(&mut self, bus: BusId) -> Result<Self::Display, DisplayError> {
        match bus {
            BusId::I2c0 => {
                let i2c = self.bus0.take().ok_or(DisplayError::Unavailable)?;
                let mut lcd = Jhd1313::new(i2c, self.delay.clone(), self.backlight);
                match lcd.init() {
                    Ok(()) => Ok(GroveLcd::I2c0(lcd)),
                    Err(e) => {
                        self.bus0 = Some(lcd.release());
                        Err(e)
                    }
                }
            }
            BusId::I2c1 => {
                let i2c = self.bus1.take().ok_or(DisplayError::Unavailable)?;
                let mut lcd = Jhd1313::new(i2c, self.delay.clone(), self.backlight);
                match lcd.init() {
                    Ok(()) => Ok(GroveLcd::I2c1(lcd)),
                    Err(e) => {
                        self.bus1 = Some(lcd.release());
                        Err(e)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    #[derive(Clone)]
    struct TestDelay;

    impl DelayNs for TestDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn init_ok() -> [I2cTransaction; 6] {
        [0x28, 0x28, 0x28, 0x0C, 0x01, 0x06]
            .map(|c| I2cTransaction::write(0x3E, vec![0x80, c]))
    }

    #[test]
    fn test_missing_bus_is_unavailable() {
        let mut bus0 = I2cMock::new(&init_ok());
        let mut provider: GroveLcdProvider<_, &mut I2cMock, _> =
            GroveLcdProvider::new(Some(&mut bus0), None, TestDelay, BacklightKind::Absent);

        assert!(matches!(
            provider.open(BusId::I2c1),
            Err(DisplayError::Unavailable)
        ));
        assert!(matches!(provider.open(BusId::I2c0), Ok(GroveLcd::I2c0(_))));
        // Bus already claimed
        assert!(matches!(
            provider.open(BusId::I2c0),
            Err(DisplayError::Unavailable)
        ));
        bus0.done();
    }

    #[test]
    fn test_failed_init_keeps_bus() {
        let mut bus1 = I2cMock::new(&[
            I2cTransaction::write(0x3E, vec![0x80, 0x28]).with_error(ErrorKind::Other),
            I2cTransaction::write(0x3E, vec![0x80, 0x28]),
            I2cTransaction::write(0x3E, vec![0x80, 0x28]),
            I2cTransaction::write(0x3E, vec![0x80, 0x28]),
            I2cTransaction::write(0x3E, vec![0x80, 0x0C]),
            I2cTransaction::write(0x3E, vec![0x80, 0x01]),
            I2cTransaction::write(0x3E, vec![0x80, 0x06]),
        ]);
        let mut provider: GroveLcdProvider<&mut I2cMock, _, _> =
            GroveLcdProvider::new(None, Some(&mut bus1), TestDelay, BacklightKind::Absent);

        assert!(matches!(provider.open(BusId::I2c1), Err(DisplayError::Bus)));
        assert!(matches!(provider.open(BusId::I2c1), Ok(GroveLcd::I2c1(_))));
        bus1.done();
    }
}
