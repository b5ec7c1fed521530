//! Error taxonomy for command handling
//!
//! Every variant collapses to the same `error` reply on the wire. The
//! detail is kept for logging and tests.

use picogrove_hal::{AdcError, PwmError};
use picogrove_protocol::{FramingError, ValidationError};

use crate::device::ranging::RangingError;
use crate::traits::{DisplayError, SensorError};

/// Failures raised by the device layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdapterError {
    /// Pin number is not wired for this operation
    UnknownPin,
    /// `pinMode` token is not an input or output mode
    UnknownMode,
    /// `digitalWrite` token is not HIGH or LOW
    UnknownLevel,
    /// `dhtRead` module type is not 0 or 1
    UnknownModuleType,
    Adc(AdcError),
    Pwm(PwmError),
    Ranging(RangingError),
    Display(DisplayError),
    Sensor(SensorError),
}

impl From<AdcError> for AdapterError {
    fn from(e: AdcError) -> Self {
        AdapterError::Adc(e)
    }
}

impl From<PwmError> for AdapterError {
    fn from(e: PwmError) -> Self {
        AdapterError::Pwm(e)
    }
}

impl From<RangingError> for AdapterError {
    fn from(e: RangingError) -> Self {
        AdapterError::Ranging(e)
    }
}

impl From<DisplayError> for AdapterError {
    fn from(e: DisplayError) -> Self {
        AdapterError::Display(e)
    }
}

impl From<SensorError> for AdapterError {
    fn from(e: SensorError) -> Self {
        AdapterError::Sensor(e)
    }
}

/// Any reason a command line produced `error`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Line could not be framed or is not call-shaped
    Framing(FramingError),
    /// Call did not name a command or had bad arguments
    Validation(ValidationError),
    /// Command reached the device layer and failed there
    Adapter(AdapterError),
}

impl From<FramingError> for Error {
    fn from(e: FramingError) -> Self {
        Error::Framing(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<AdapterError> for Error {
    fn from(e: AdapterError) -> Self {
        Error::Adapter(e)
    }
}
