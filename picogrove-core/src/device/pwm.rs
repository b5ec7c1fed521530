//! PWM channel cache for `analogWrite`
//!
//! A channel is opened the first time a pin is written and reused for
//! every later write. Channels are never closed, but a digital command on
//! the same pin takes the pad back; the next write routes it to PWM again.

use heapless::Vec;
use picogrove_hal::{PwmError, PwmOutput, PwmProvider};

use super::registry::MAX_DIGITAL_PINS;

/// Duty cycle for an 8-bit `analogWrite` value
///
/// Values are clamped to 0-255 and scaled so that 255 is fully on.
pub fn duty_for(value: i64) -> u16 {
    value.clamp(0, 255) as u16 * 257
}

struct Slot<C> {
    pin: u8,
    channel: C,
    /// Pad currently routed to the PWM output
    on_pad: bool,
}

/// Lazily opened PWM channels keyed by pin number
pub struct PwmCache<P: PwmProvider> {
    provider: P,
    frequency_hz: u32,
    channels: Vec<Slot<P::Channel>, MAX_DIGITAL_PINS>,
}

impl<P: PwmProvider> PwmCache<P> {
    /// Create an empty cache opening channels at `frequency_hz`
    pub fn new(provider: P, frequency_hz: u32) -> Self {
        Self {
            provider,
            frequency_hz,
            channels: Vec::new(),
        }
    }

    /// Whether a channel is open on `pin`
    pub fn is_open(&self, pin: u8) -> bool {
        self.channels.iter().any(|slot| slot.pin == pin)
    }

    /// Whether `pin`'s pad is driven by its PWM channel
    pub fn drives_pad(&self, pin: u8) -> bool {
        self.channels.iter().any(|slot| slot.pin == pin && slot.on_pad)
    }

    /// Number of open channels
    pub fn open_count(&self) -> usize {
        self.channels.len()
    }

    /// Set the duty on `pin` from an 8-bit value, opening the channel if needed
    ///
    /// A pad taken back by [`release`](Self::release) is routed to the
    /// channel again.
    pub fn write(&mut self, pin: u8, value: i64) -> Result<(), PwmError> {
        let duty = duty_for(value);
        let slot = self.slot(pin)?;
        slot.channel.set_duty_u16(duty)?;
        if !slot.on_pad {
            slot.channel.attach()?;
            slot.on_pad = true;
        }
        Ok(())
    }

    /// Give `pin`'s pad up for plain digital use
    ///
    /// Returns `true` when the pad was routed to PWM and the caller must
    /// reclaim it for its digital line.
    pub fn release(&mut self, pin: u8) -> bool {
        match self.channels.iter_mut().find(|slot| slot.pin == pin) {
            Some(slot) if slot.on_pad => {
                slot.on_pad = false;
                true
            }
            _ => false,
        }
    }

    fn slot(&mut self, pin: u8) -> Result<&mut Slot<P::Channel>, PwmError> {
        let idx = match self.channels.iter().position(|slot| slot.pin == pin) {
            Some(idx) => idx,
            None => {
                let channel = self.provider.open(pin, self.frequency_hz)?;
                self.channels
                    .push(Slot {
                        pin,
                        channel,
                        on_pad: true,
                    })
                    .map_err(|_| PwmError::Unavailable)?;
                #[cfg(feature = "defmt")]
                defmt::debug!("PWM opened on pin {} at {} Hz", pin, self.frequency_hz);
                self.channels.len() - 1
            }
        };
        Ok(&mut self.channels[idx])
    }
}
