//! Picogrove Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The command server only talks to the Grove ports
//! through these traits, so the same logic runs against the RP2040 HAL on
//! target and against mocks on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (picogrove-core/firmware)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picogrove-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ picogrove-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalLine`], [`gpio::PulseIn`] - Reconfigurable Grove lines
//! - [`gpio::OutputPin`] - Indicator outputs
//! - [`adc::AnalogSampler`] - Analog inputs
//! - [`pwm::PwmProvider`], [`pwm::PwmOutput`] - PWM outputs
//!
//! I2C and delays use the `embedded-hal` 1.0 traits directly.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogSampler};
pub use gpio::{DigitalLine, Direction, Level, OutputPin, PulseError, PulseIn};
pub use pwm::{PwmError, PwmOutput, PwmProvider, SliceTiming};
