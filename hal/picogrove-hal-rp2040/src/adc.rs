//! ADC sampling for the Grove analog ports
//!
//! RP2040 has a single 12-bit ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor
//!
//! Channels are registered in order; the sampler channel number is the
//! registration index.

use embassy_rp::adc::{Adc, Blocking, Channel};
use heapless::Vec;
use picogrove_hal::adc::scale_12bit_to_u16;
use picogrove_hal::{AdcError, AnalogSampler};

/// Maximum registered channels
pub const MAX_CHANNELS: usize = 4;

/// Blocking sampler over a set of ADC channels
pub struct GroveAdc {
    adc: Adc<'static, Blocking>,
    channels: Vec<Channel<'static>, MAX_CHANNELS>,
}

impl GroveAdc {
    /// Create a sampler; channels beyond [`MAX_CHANNELS`] are dropped
    pub fn new(
        adc: Adc<'static, Blocking>,
        channels: impl IntoIterator<Item = Channel<'static>>,
    ) -> Self {
        let mut registered = Vec::new();
        for channel in channels.into_iter().take(MAX_CHANNELS) {
            let _ = registered.push(channel);
        }
        Self {
            adc,
            channels: registered,
        }
    }
}

impl AnalogSampler for GroveAdc {
    fn read_u16(&mut self, channel: u8) -> Result<u16, AdcError> {
        let channel = self
            .channels
            .get_mut(channel as usize)
            .ok_or(AdcError::InvalidChannel)?;
        let raw = self
            .adc
            .blocking_read(channel)
            .map_err(|_| AdcError::ConversionFailed)?;
        Ok(scale_12bit_to_u16(raw))
    }
}
