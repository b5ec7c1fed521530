//! PWM on the Grove digital ports
//!
//! Each Grove signal pin sits on channel A of its own slice:
//!
//! | Port | GPIO | Slice |
//! |------|------|-------|
//! | D16  | 16   | 0     |
//! | D18  | 18   | 1     |
//! | D20  | 20   | 2     |
//!
//! The GPIO is shared with the port's [`GroveLine`](crate::gpio::GroveLine).
//! Opening PWM hands the pad over to the slice. A digital command on the
//! port reclaims the pad for SIO, and [`PwmOutput::attach`] hands it back
//! on the next write.

use core::mem;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::peripherals::{PIN_16, PIN_18, PIN_20, PWM_SLICE0, PWM_SLICE1, PWM_SLICE2};
use embassy_rp::pwm::{Config, Pwm};
use embassy_rp::Peri;
use fixed::FixedU16;
use picogrove_hal::{PwmError, PwmOutput, PwmProvider, SliceTiming};

/// An open PWM output
pub struct GrovePwmChannel {
    pwm: Pwm<'static>,
    pin: u8,
    config: Config,
    timing: SliceTiming,
}

impl PwmOutput for GrovePwmChannel {
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), PwmError> {
        self.config.compare_a = self.timing.compare_for(duty);
        self.pwm.set_config(&self.config);
        Ok(())
    }

    fn attach(&mut self) -> Result<(), PwmError> {
        // SAFETY: this channel owns the slice; the old driver is forgotten
        // rather than dropped, which would disable the slice and unroute
        // the pad.
        let fresh = unsafe { output_a(self.pin, self.config.clone()) }?;
        mem::forget(mem::replace(&mut self.pwm, fresh));
        Ok(())
    }
}

/// Route `pin` to channel A of its slice
///
/// # Safety
/// The caller must own the slice for `pin`, and the pad may only be driven
/// through SIO by the port's `GroveLine`.
unsafe fn output_a(pin: u8, config: Config) -> Result<Pwm<'static>, PwmError> {
    let pwm = unsafe {
        match pin {
            16 => Pwm::new_output_a(PWM_SLICE0::steal(), PIN_16::steal(), config),
            18 => Pwm::new_output_a(PWM_SLICE1::steal(), PIN_18::steal(), config),
            20 => Pwm::new_output_a(PWM_SLICE2::steal(), PIN_20::steal(), config),
            _ => return Err(PwmError::InvalidPin),
        }
    };
    Ok(pwm)
}

/// PWM slices behind the Grove digital ports
pub struct GrovePwm {
    slice0: Option<Peri<'static, PWM_SLICE0>>,
    slice1: Option<Peri<'static, PWM_SLICE1>>,
    slice2: Option<Peri<'static, PWM_SLICE2>>,
}

impl GrovePwm {
    pub fn new(
        slice0: Peri<'static, PWM_SLICE0>,
        slice1: Peri<'static, PWM_SLICE1>,
        slice2: Peri<'static, PWM_SLICE2>,
    ) -> Self {
        Self {
            slice0: Some(slice0),
            slice1: Some(slice1),
            slice2: Some(slice2),
        }
    }
}

impl PwmProvider for GrovePwm {
    type Channel = GrovePwmChannel;

    fn open(&mut self, pin: u8, frequency_hz: u32) -> Result<Self::Channel, PwmError> {
        let timing = SliceTiming::for_frequency(clk_sys_freq(), frequency_hz)?;

        let mut config = Config::default();
        config.divider = FixedU16::from_bits(timing.divider_x16);
        config.top = timing.top;
        config.compare_a = 0;

        // SAFETY: the pad stays owned by the port's GroveLine, which only
        // touches the SIO registers and, on reclaim, the function select.
        // Taking the slice out of its Option guarantees each pin is
        // claimed for PWM at most once.
        let pwm = match pin {
            16 => {
                let slice = self.slice0.take().ok_or(PwmError::Unavailable)?;
                Pwm::new_output_a(slice, unsafe { PIN_16::steal() }, config.clone())
            }
            18 => {
                let slice = self.slice1.take().ok_or(PwmError::Unavailable)?;
                Pwm::new_output_a(slice, unsafe { PIN_18::steal() }, config.clone())
            }
            20 => {
                let slice = self.slice2.take().ok_or(PwmError::Unavailable)?;
                Pwm::new_output_a(slice, unsafe { PIN_20::steal() }, config.clone())
            }
            _ => return Err(PwmError::InvalidPin),
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PWM on GPIO{}: divider {}/16, top {}",
            pin,
            timing.divider_x16,
            timing.top
        );

        Ok(GrovePwmChannel {
            pwm,
            pin,
            config,
            timing,
        })
    }
}
