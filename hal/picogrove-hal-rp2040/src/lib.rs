//! RP2040-specific HAL for the Picogrove firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `picogrove-hal` traits for the Grove Shield for Pi Pico:
//!
//! - Grove port lines (digital I/O and pulse timing)
//! - ADC sampling on the analog ports
//! - PWM on the digital ports
//! - Status LED
//! - Blocking delay on the embassy timer

#![no_std]

pub mod adc;
pub mod delay;
pub mod gpio;
pub mod pwm;

pub use adc::GroveAdc;
pub use delay::BlockingDelay;
pub use gpio::{GroveLine, StatusLed};
pub use pwm::{GrovePwm, GrovePwmChannel};
