//! Blocking delay on the embassy timer

use embassy_time::{block_for, Duration};
use embedded_hal::delay::DelayNs;

/// Busy-wait delay with microsecond resolution
///
/// Copyable so every driver can hold its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDelay;

impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        block_for(Duration::from_micros(ns.div_ceil(1000) as u64));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
