//! Board description
//!
//! A board names the concrete driver types behind each capability the
//! command server uses and hands over the instances at startup.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use picogrove_hal::{AnalogSampler, DigitalLine, PulseIn, PwmProvider};

use crate::device::registry::{AnalogPin, MAX_ANALOG_PINS, MAX_DIGITAL_PINS};
use crate::traits::{DisplayProvider, HumidityProbe};

/// Driver types for one board
pub trait Board {
    /// Reconfigurable digital line on a Grove port
    type Line: DigitalLine + PulseIn;
    /// Analog-to-digital converter
    type Analog: AnalogSampler;
    /// PWM channel factory
    type Pwm: PwmProvider;
    /// Display factory for the I2C buses
    type Displays: DisplayProvider;
    /// Humidity/temperature probe driver
    type Probe: HumidityProbe<Self::Line>;
    /// Microsecond delay
    type Delay: DelayNs;
}

/// Driver instances handed to the device context
pub struct BoardParts<B: Board> {
    /// Digital lines with their pin numbers
    pub digital: Vec<(u8, B::Line), MAX_DIGITAL_PINS>,
    /// Analog pin wiring
    pub analog_pins: Vec<AnalogPin, MAX_ANALOG_PINS>,
    pub analog: B::Analog,
    pub pwm: B::Pwm,
    pub displays: B::Displays,
    pub probe: B::Probe,
    pub delay: B::Delay,
}
