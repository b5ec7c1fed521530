//! GPIO pin abstractions
//!
//! Provides traits for the reconfigurable digital lines on the Grove ports
//! and for plain status outputs, implemented by chip-specific HALs.

/// Direction of a reconfigurable digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High-impedance input
    Input,
    /// Push-pull output
    Output,
}

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Protocol value of the level (0 or 1)
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Errors from pulse-width measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseError {
    /// The pulse did not start or did not end within the timeout
    Timeout,
}

/// Digital line that can switch between input and output at runtime
///
/// Writing to a line configured as input stores the level; it is driven
/// once the line becomes an output again.
pub trait DigitalLine {
    /// Switch the line direction
    fn set_direction(&mut self, direction: Direction);

    /// Current direction
    fn direction(&self) -> Direction;

    /// Drive the line to a level
    fn write(&mut self, level: Level);

    /// Sample the line
    fn read(&mut self) -> Level;

    /// Take the pad back for plain GPIO after another function claimed it
    ///
    /// Direction and stored level are kept.
    fn reclaim(&mut self) {}
}

/// Timed pulse measurement on an input line
pub trait PulseIn {
    /// Measure the duration of the next pulse at `level`
    ///
    /// Waits for the line to enter `level`, then for it to leave it.
    /// Returns the time spent at `level` in microseconds.
    ///
    /// # Arguments
    /// - `level`: Level of the pulse to time
    /// - `timeout_us`: Bound on each wait, in microseconds
    fn pulse_in(&mut self, level: Level, timeout_us: u32) -> Result<u32, PulseError>;
}

/// Digital output pin
///
/// Used for indicators such as the on-board activity LED.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        T::set_high(self)
    }

    fn set_low(&mut self) {
        T::set_low(self)
    }

    fn is_set_high(&self) -> bool {
        T::is_set_high(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_level_values() {
        assert_eq!(Level::Low.as_u8(), 0);
        assert_eq!(Level::High.as_u8(), 1);
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(!Level::High, Level::Low);
    }

    #[test]
    fn test_set_state() {
        let mut pin = MockPin { high: false };
        pin.set_state(true);
        assert!(pin.is_set_high());
        pin.set_state(false);
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_output_pin_through_reference() {
        fn drive<P: OutputPin>(mut pin: P) {
            pin.set_high();
        }

        let mut pin = MockPin { high: false };
        drive(&mut pin);
        assert!(pin.high);
    }
}
