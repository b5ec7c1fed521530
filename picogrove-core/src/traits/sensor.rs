//! Humidity/temperature probe traits

use picogrove_hal::{DigitalLine, PulseIn};
use picogrove_protocol::Reading;

/// Errors that can occur while measuring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not answer the start signal
    NoResponse,
    /// Sensor stopped mid-transfer
    Timeout,
    /// Data did not match its checksum
    Checksum,
    /// Values outside the sensor's physical range
    Implausible,
}

/// Single-wire sensor variant, selected by the `dhtRead` module type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// DHT11 (module type 0)
    Dht11,
    /// DHT22 / AM2302 (module type 1)
    Dht22,
}

impl SensorKind {
    /// Map a protocol module type code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SensorKind::Dht11),
            1 => Some(SensorKind::Dht22),
            _ => None,
        }
    }
}

/// Trait for humidity/temperature probes on a shared digital line
///
/// The probe borrows the line for one measurement; the line belongs to the
/// pin registry between measurements.
pub trait HumidityProbe<L: DigitalLine + PulseIn> {
    /// Take one measurement
    fn measure(&mut self, line: &mut L, kind: SensorKind) -> Result<Reading, SensorError>;
}
