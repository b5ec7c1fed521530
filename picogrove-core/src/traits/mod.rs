//! Hardware abstraction traits
//!
//! These traits define the interface between the command server and
//! the device drivers.

pub mod display;
pub mod sensor;

pub use display::{CharacterDisplay, DisplayError, DisplayProvider, RgbBacklight};
pub use sensor::{HumidityProbe, SensorError, SensorKind};
