//! Protocol-level error types

/// Errors detected while framing or parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramingError {
    /// Line is not of the form `name(args)`
    NotACall,
    /// Line exceeded the receive buffer
    LineTooLong,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

/// Errors detected while validating a parsed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Name does not match any command
    UnknownCommand,
    /// Wrong number of arguments
    ArityMismatch {
        /// Arguments the command takes
        expected: u8,
        /// Non-empty arguments supplied
        found: u8,
    },
    /// Argument that must be an integer is not one
    NotAnInteger,
    /// Bus token is not `0`, `1`, `i2c0` or `i2c1`
    UnknownBus,
}

/// Errors when decoding a reply on the host side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// Device answered `error`
    Device,
    /// Reply does not have the shape the command produces
    Malformed,
}
