//! Board-agnostic core logic for the Picogrove command server
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Driver traits for displays and humidity sensors
//! - Device adapters (pin registry, PWM cache, display and sensor caches,
//!   ultrasonic ranging)
//! - Command dispatcher
//! - Serial session loop
//! - Runtime settings

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod traits;

pub use board::{Board, BoardParts};
pub use dispatch::DeviceContext;
pub use error::{AdapterError, Error};
pub use session::{ActivityGuard, Session, SessionError};
