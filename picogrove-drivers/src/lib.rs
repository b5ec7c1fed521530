//! Grove module drivers
//!
//! This crate provides concrete implementations of the traits defined
//! in picogrove-core for the Grove modules the command server talks to:
//!
//! - Grove LCD RGB Backlight (JHD1313 with PCA9633 or SGM31323)
//! - DHT11 / DHT22 temperature and humidity sensors

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
