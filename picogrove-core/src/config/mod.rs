//! Configuration types
//!
//! Board-agnostic settings, optionally deserialized from TOML.

pub mod settings;

pub use settings::*;
