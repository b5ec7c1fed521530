//! PWM abstractions and slice timing math

/// Errors when opening or driving a PWM channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Pin has no PWM function
    InvalidPin,
    /// PWM slice for the pin is already claimed
    Unavailable,
    /// Requested carrier frequency cannot be generated
    FrequencyOutOfRange,
}

/// An open PWM output with a fixed carrier frequency
pub trait PwmOutput {
    /// Set the duty cycle on the 16-bit scale (0 = off, 65535 = fully on)
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), PwmError>;

    /// Route the pin's pad back to this output
    ///
    /// Called before driving again after the pad was reclaimed by a
    /// [`DigitalLine`](crate::gpio::DigitalLine). Chips without pad muxing
    /// keep the default.
    fn attach(&mut self) -> Result<(), PwmError> {
        Ok(())
    }
}

/// Factory for PWM outputs on digital pins
pub trait PwmProvider {
    /// Output type handed out by this provider
    type Channel: PwmOutput;

    /// Configure `pin` as a PWM output running at `frequency_hz`
    fn open(&mut self, pin: u8, frequency_hz: u32) -> Result<Self::Channel, PwmError>;
}

/// Integer divider (in 1/16 steps) and wrap value for a PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliceTiming {
    /// Clock divider in sixteenths (16 = divide by 1)
    pub divider_x16: u16,
    /// Counter wrap value
    pub top: u16,
}

impl SliceTiming {
    /// Smallest divider (in sixteenths) the slice accepts
    pub const MIN_DIVIDER_X16: u32 = 16;
    /// Largest divider (255 + 15/16)
    pub const MAX_DIVIDER_X16: u32 = 255 * 16 + 15;

    /// Compute the timing for a carrier frequency
    ///
    /// Picks the smallest divider that keeps the wrap value inside 16 bits,
    /// maximizing duty resolution.
    ///
    /// # Arguments
    /// - `clock_hz`: PWM input clock (system clock)
    /// - `frequency_hz`: Desired carrier frequency
    pub fn for_frequency(clock_hz: u32, frequency_hz: u32) -> Result<Self, PwmError> {
        if frequency_hz == 0 {
            return Err(PwmError::FrequencyOutOfRange);
        }

        let clock_x16 = clock_hz as u64 * 16;
        let period_span = frequency_hz as u64 * 65_536;
        let divider_x16 = clock_x16
            .div_ceil(period_span)
            .max(Self::MIN_DIVIDER_X16 as u64);

        if divider_x16 > Self::MAX_DIVIDER_X16 as u64 {
            return Err(PwmError::FrequencyOutOfRange);
        }

        let counts = clock_x16 / (divider_x16 * frequency_hz as u64);
        if counts < 2 {
            return Err(PwmError::FrequencyOutOfRange);
        }

        Ok(Self {
            divider_x16: divider_x16 as u16,
            top: (counts - 1).min(u16::MAX as u64) as u16,
        })
    }

    /// Compare value producing `duty` (16-bit scale) with this wrap value
    pub fn compare_for(&self, duty: u16) -> u16 {
        let span = self.top as u32 + 1;
        let compare = (duty as u32 * span + 32_767) / 65_535;
        compare.min(u16::MAX as u32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYS_CLK: u32 = 125_000_000;

    #[test]
    fn test_timing_for_1khz() {
        let timing = SliceTiming::for_frequency(SYS_CLK, 1000).unwrap();
        assert_eq!(timing.divider_x16, 31);
        assert_eq!(timing.top, 64_515);

        // Effective frequency within 0.1%
        let counts = (timing.top as u64 + 1) * timing.divider_x16 as u64;
        let freq = SYS_CLK as u64 * 16 / counts;
        assert!((999..=1001).contains(&freq));
    }

    #[test]
    fn test_timing_high_frequency_uses_unit_divider() {
        let timing = SliceTiming::for_frequency(SYS_CLK, 100_000).unwrap();
        assert_eq!(timing.divider_x16, 16);
        assert_eq!(timing.top, 1249);
    }

    #[test]
    fn test_timing_rejects_zero() {
        assert_eq!(
            SliceTiming::for_frequency(SYS_CLK, 0),
            Err(PwmError::FrequencyOutOfRange)
        );
    }

    #[test]
    fn test_timing_rejects_too_slow() {
        // Needs a divider far above 256
        assert_eq!(
            SliceTiming::for_frequency(SYS_CLK, 1),
            Err(PwmError::FrequencyOutOfRange)
        );
    }

    #[test]
    fn test_compare_endpoints() {
        let timing = SliceTiming::for_frequency(SYS_CLK, 1000).unwrap();
        assert_eq!(timing.compare_for(0), 0);
        assert_eq!(timing.compare_for(u16::MAX), timing.top + 1);
    }

    #[test]
    fn test_compare_half() {
        let timing = SliceTiming {
            divider_x16: 16,
            top: 999,
        };
        assert_eq!(timing.compare_for(32_768), 500);
    }
}
