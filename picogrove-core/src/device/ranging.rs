//! Ultrasonic ranging for `ultrasonicRead`
//!
//! Grove Ultrasonic Ranger protocol on a single line: a 10 µs trigger
//! pulse, then the sensor raises the same line for as long as the echo
//! took to return.

use embedded_hal::delay::DelayNs;
use picogrove_hal::{DigitalLine, Direction, Level, PulseError, PulseIn};

/// Errors from a ranging measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingError {
    /// No echo pulse within the timeout
    Timeout,
    /// Echo pulse of zero length
    InvalidPulse,
}

impl From<PulseError> for RangingError {
    fn from(e: PulseError) -> Self {
        match e {
            PulseError::Timeout => RangingError::Timeout,
        }
    }
}

/// Round-trip time per centimetre of distance, in microseconds
pub const US_PER_CM: u32 = 58;

/// Convert an echo duration to centimetres, rounding halves up
pub fn distance_cm(echo_us: u32) -> u32 {
    ((echo_us as u64 + (US_PER_CM / 2) as u64) / US_PER_CM as u64) as u32
}

/// Trigger the ranger on `line` and measure the distance
///
/// # Arguments
/// - `line`: Line the ranger's SIG pin is wired to
/// - `delay`: Microsecond delay source for the trigger pulse
/// - `timeout_us`: Longest echo to wait for
pub fn measure_distance<L, D>(
    line: &mut L,
    delay: &mut D,
    timeout_us: u32,
) -> Result<u32, RangingError>
where
    L: DigitalLine + PulseIn,
    D: DelayNs,
{
    line.write(Level::Low);
    line.set_direction(Direction::Output);
    delay.delay_us(2);
    line.write(Level::High);
    delay.delay_us(10);
    line.write(Level::Low);

    line.set_direction(Direction::Input);
    let echo_us = line.pulse_in(Level::High, timeout_us)?;
    if echo_us == 0 {
        return Err(RangingError::InvalidPulse);
    }

    Ok(distance_cm(echo_us))
}
