//! Analog sampling abstractions

/// Errors from an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel is not wired to the sampler
    InvalidChannel,
    /// Conversion did not complete
    ConversionFailed,
}

/// Multi-channel analog sampler
///
/// Samples are reported on the full 16-bit scale regardless of the
/// converter's native resolution.
pub trait AnalogSampler {
    /// Take one sample from `channel`
    fn read_u16(&mut self, channel: u8) -> Result<u16, AdcError>;
}

/// Expand a 12-bit conversion result to the 16-bit range
///
/// Replicates the top bits into the low nibble so that full scale maps
/// to 65535 and zero stays zero.
pub fn scale_12bit_to_u16(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}
