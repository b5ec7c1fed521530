//! Grove port lines and the status LED
//!
//! Grove digital ports on the Pico shield expose one GPIO as the signal
//! pin. The line is reconfigured between input and output at runtime, so
//! it is held as a [`Flex`].
//!
//! The same pad can be handed to a PWM slice, which switches its function
//! select away from SIO. [`DigitalLine::reclaim`] switches it back.

use core::mem;

use embassy_rp::gpio::{AnyPin, Flex, Output, Pin, Pull};
use embassy_rp::Peri;
use embassy_time::{Duration, Instant};
use picogrove_hal::{DigitalLine, Direction, Level, OutputPin, PulseError, PulseIn};

fn to_embassy(level: Level) -> embassy_rp::gpio::Level {
    match level {
        Level::Low => embassy_rp::gpio::Level::Low,
        Level::High => embassy_rp::gpio::Level::High,
    }
}

/// Signal pin of a Grove digital port
pub struct GroveLine {
    pin: Flex<'static>,
    gpio: u8,
    direction: Direction,
}

impl GroveLine {
    /// Take the pin as a floating input
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let gpio = pin.pin();
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::None);
        pin.set_as_input();
        Self {
            pin,
            gpio,
            direction: Direction::Input,
        }
    }

    /// Spin until the line is at `level` or `deadline` passes
    fn wait_for(&mut self, level: Level, deadline: Instant) -> Result<(), PulseError> {
        let high = level == Level::High;
        while self.pin.is_high() != high {
            if Instant::now() > deadline {
                return Err(PulseError::Timeout);
            }
        }
        Ok(())
    }
}

impl DigitalLine for GroveLine {
    fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Input => self.pin.set_as_input(),
            Direction::Output => self.pin.set_as_output(),
        }
        self.direction = direction;
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn write(&mut self, level: Level) {
        self.pin.set_level(to_embassy(level));
    }

    fn read(&mut self) -> Level {
        Level::from(self.pin.is_high())
    }

    fn reclaim(&mut self) {
        // SAFETY: this line is the only owner of the GPIO on the SIO side.
        // The old handle is forgotten, not dropped, so exactly one Flex
        // refers to the pad afterwards. Dropping it would also reset the
        // function select to NULL.
        let fresh = Flex::new(unsafe { AnyPin::steal(self.gpio) });
        mem::forget(mem::replace(&mut self.pin, fresh));

        // Flex::new selects SIO but leaves the output enable and latch alone
        self.pin.set_pull(Pull::None);
        self.set_direction(self.direction);
    }
}

impl PulseIn for GroveLine {
    /// Busy-waits on the timer; blocks the executor for the whole pulse
    fn pulse_in(&mut self, level: Level, timeout_us: u32) -> Result<u32, PulseError> {
        let timeout = Duration::from_micros(timeout_us as u64);

        self.wait_for(level, Instant::now() + timeout)?;
        let start = Instant::now();
        self.wait_for(!level, start + timeout)?;

        Ok(start.elapsed().as_micros().min(u32::MAX as u64) as u32)
    }
}

/// On-board LED used as the activity indicator
pub struct StatusLed {
    pin: Output<'static>,
}

impl StatusLed {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl OutputPin for StatusLed {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
