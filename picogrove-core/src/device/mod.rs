//! Device adapters
//!
//! Stateful wrappers between the dispatcher and the drivers:
//!
//! - Pin registry (digital lines, analog channels)
//! - PWM channel cache
//! - Per-bus display cache and text layout
//! - Humidity sensor with last-good-value fallback
//! - Ultrasonic ranging

pub mod display;
pub mod pwm;
pub mod ranging;
pub mod registry;
pub mod sensor;

pub use display::{layout_text, DisplayAdapter, TextLayout};
pub use pwm::{duty_for, PwmCache};
pub use ranging::{distance_cm, measure_distance, RangingError};
pub use registry::{AnalogPin, Registry, RegistryError};
pub use sensor::SensorAdapter;
