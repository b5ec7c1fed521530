//! Sensor adapter for `dhtRead`
//!
//! Single-wire humidity sensors fail a fair share of reads. Every call
//! takes a fresh measurement; when it fails, the last good reading for the
//! same pin and sensor kind is returned instead.

use heapless::FnvIndexMap;
use picogrove_hal::{DigitalLine, PulseIn};
use picogrove_protocol::Reading;

use crate::traits::{HumidityProbe, SensorError, SensorKind};

/// Cached readings; covers every digital pin with both sensor kinds
const CACHE_SIZE: usize = 16;

/// Humidity probe with last-good-value fallback
pub struct SensorAdapter<H> {
    probe: H,
    last_good: FnvIndexMap<(u8, SensorKind), Reading, CACHE_SIZE>,
}

impl<H> SensorAdapter<H> {
    pub fn new(probe: H) -> Self {
        Self {
            probe,
            last_good: FnvIndexMap::new(),
        }
    }

    /// Last successful reading for a pin and sensor kind
    pub fn cached(&self, pin: u8, kind: SensorKind) -> Option<Reading> {
        self.last_good.get(&(pin, kind)).copied()
    }

    /// Measure on `line`, falling back to the cached reading on failure
    ///
    /// Readings outside the sensor's physical range count as failures.
    pub fn read<L>(
        &mut self,
        pin: u8,
        line: &mut L,
        kind: SensorKind,
    ) -> Result<Reading, SensorError>
    where
        L: DigitalLine + PulseIn,
        H: HumidityProbe<L>,
    {
        let measured = self.probe.measure(line, kind).and_then(|reading| {
            if reading.is_plausible() {
                Ok(reading)
            } else {
                Err(SensorError::Implausible)
            }
        });

        match measured {
            Ok(reading) => {
                // Full map only loses the fallback, never the reading
                let _ = self.last_good.insert((pin, kind), reading);
                Ok(reading)
            }
            Err(e) => match self.cached(pin, kind) {
                Some(reading) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Sensor on pin {} failed ({}), using cached reading", pin, e);
                    Ok(reading)
                }
                None => Err(e),
            },
        }
    }
}
