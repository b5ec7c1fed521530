//! Character display drivers

pub mod jhd1313;
pub mod provider;

pub use jhd1313::Jhd1313;
pub use provider::{GroveLcd, GroveLcdProvider};
