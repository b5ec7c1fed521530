//! DHT11 / DHT22 single-wire humidity and temperature sensor
//!
//! # Protocol
//!
//! The host pulls the data line low for a start signal, then releases it.
//! The sensor answers with an 80 µs low / 80 µs high preamble followed by
//! 40 bits, each a ~50 µs low gap and a high pulse whose length encodes
//! the bit (~27 µs for 0, ~70 µs for 1).
//!
//! Frame layout (5 bytes, MSB first):
//! - DHT11: humidity integral, humidity decimal, temperature integral,
//!   temperature decimal, checksum
//! - DHT22: humidity x10 (16 bit), temperature x10 (15 bit + sign bit),
//!   checksum
//!
//! The checksum is the low byte of the sum of the first four bytes.

use embedded_hal::delay::DelayNs;
use picogrove_core::traits::{HumidityProbe, SensorError, SensorKind};
use picogrove_hal::{DigitalLine, Direction, Level, PulseError, PulseIn};
use picogrove_protocol::Reading;

/// High pulses longer than this are a 1 bit
const BIT_THRESHOLD_US: u32 = 50;

/// Bound on every edge wait during a transfer
const EDGE_TIMEOUT_US: u32 = 200;

/// Start signal length for a sensor kind
fn start_signal_us(kind: SensorKind) -> u32 {
    match kind {
        SensorKind::Dht11 => 18_000,
        SensorKind::Dht22 => 1_000,
    }
}

/// Decode a received frame
pub fn decode_frame(frame: &[u8; 5], kind: SensorKind) -> Result<Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let reading = match kind {
        SensorKind::Dht11 => Reading::new(frame[2] as i16 * 10, frame[0] as u16 * 10),
        SensorKind::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]);
            let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as i16;
            let temperature = if frame[2] & 0x80 != 0 {
                -magnitude
            } else {
                magnitude
            };
            Reading::new(temperature, humidity)
        }
    };
    Ok(reading)
}

/// DHT sensor driver
///
/// Stateless apart from the delay; the data line is borrowed for each
/// measurement.
pub struct Dht<D> {
    delay: D,
}

impl<D: DelayNs> Dht<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Send the start signal and receive the raw 5-byte frame
    pub fn read_frame<L>(
        &mut self,
        line: &mut L,
        kind: SensorKind,
    ) -> Result<[u8; 5], SensorError>
    where
        L: DigitalLine + PulseIn,
    {
        line.write(Level::Low);
        line.set_direction(Direction::Output);
        self.delay.delay_us(start_signal_us(kind));
        line.write(Level::High);
        line.set_direction(Direction::Input);

        let no_response = |_: PulseError| SensorError::NoResponse;
        line.pulse_in(Level::Low, EDGE_TIMEOUT_US).map_err(no_response)?;
        line.pulse_in(Level::High, EDGE_TIMEOUT_US).map_err(no_response)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            let high_us = line
                .pulse_in(Level::High, EDGE_TIMEOUT_US)
                .map_err(|_| SensorError::Timeout)?;
            if high_us > BIT_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }

        Ok(frame)
    }
}

impl<L, D> HumidityProbe<L> for Dht<D>
where
    L: DigitalLine + PulseIn,
    D: DelayNs,
{
    fn measure(&mut self, line: &mut L, kind: SensorKind) -> Result<Reading, SensorError> {
        let frame = self.read_frame(line, kind)?;
        let reading = decode_frame(&frame, kind);

        #[cfg(feature = "defmt")]
        match reading {
            Ok(r) => defmt::trace!("{} frame {:x} -> {}", kind, frame, r),
            Err(_) => defmt::debug!("{} checksum mismatch {:x}", kind, frame),
        }

        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::{Deque, Vec};

    fn with_checksum(bytes: [u8; 4]) -> [u8; 5] {
        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        [bytes[0], bytes[1], bytes[2], bytes[3], sum]
    }

    #[test]
    fn test_decode_dht11() {
        let frame = with_checksum([45, 0, 23, 0]);
        assert_eq!(
            decode_frame(&frame, SensorKind::Dht11),
            Ok(Reading::new(230, 450))
        );
    }

    #[test]
    fn test_decode_dht11_ignores_decimals() {
        let frame = with_checksum([45, 3, 23, 7]);
        assert_eq!(
            decode_frame(&frame, SensorKind::Dht11),
            Ok(Reading::new(230, 450))
        );
    }

    #[test]
    fn test_decode_dht22() {
        // 65.2 %, 35.1 °C
        let frame = with_checksum([0x02, 0x8C, 0x01, 0x5F]);
        assert_eq!(
            decode_frame(&frame, SensorKind::Dht22),
            Ok(Reading::new(351, 652))
        );
    }

    #[test]
    fn test_decode_dht22_negative() {
        // -10.1 °C
        let frame = with_checksum([0x01, 0x90, 0x80, 0x65]);
        assert_eq!(
            decode_frame(&frame, SensorKind::Dht22),
            Ok(Reading::new(-101, 400))
        );
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let mut frame = with_checksum([45, 0, 23, 0]);
        frame[4] ^= 1;
        assert_eq!(
            decode_frame(&frame, SensorKind::Dht11),
            Err(SensorError::Checksum)
        );
    }

    #[test]
    fn test_checksum_wraps() {
        let frame = with_checksum([0xFF, 0xFF, 0x01, 0x02]);
        assert_eq!(frame[4], 0x01);
        assert!(decode_frame(&frame, SensorKind::Dht22).is_ok());
    }

    /// Line replaying recorded pulse widths
    struct WireLine {
        pulses: Deque<Result<u32, PulseError>, 48>,
        writes: Vec<Level, 4>,
        direction: Direction,
    }

    impl WireLine {
        /// Line that answers with the given frame
        fn answering(frame: [u8; 5]) -> Self {
            let mut pulses = Deque::new();
            pulses.push_back(Ok(80)).unwrap();
            pulses.push_back(Ok(80)).unwrap();
            for bit in 0..40 {
                let one = frame[bit / 8] & (0x80 >> (bit % 8)) != 0;
                pulses.push_back(Ok(if one { 70 } else { 27 })).unwrap();
            }
            Self {
                pulses,
                writes: Vec::new(),
                direction: Direction::Output,
            }
        }

        fn silent() -> Self {
            Self {
                pulses: Deque::new(),
                writes: Vec::new(),
                direction: Direction::Output,
            }
        }
    }

    impl DigitalLine for WireLine {
        fn set_direction(&mut self, direction: Direction) {
            self.direction = direction;
        }

        fn direction(&self) -> Direction {
            self.direction
        }

        fn write(&mut self, level: Level) {
            let _ = self.writes.push(level);
        }

        fn read(&mut self) -> Level {
            Level::High
        }
    }

    impl PulseIn for WireLine {
        fn pulse_in(&mut self, _level: Level, _timeout_us: u32) -> Result<u32, PulseError> {
            assert_eq!(self.direction, Direction::Input);
            self.pulses.pop_front().unwrap_or(Err(PulseError::Timeout))
        }
    }

    struct LogDelay {
        total_us: u32,
    }

    impl DelayNs for LogDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += ns / 1000;
        }
    }

    #[test]
    fn test_measure_dht22() {
        let frame = with_checksum([0x02, 0x8C, 0x01, 0x5F]);
        let mut line = WireLine::answering(frame);
        let mut dht = Dht::new(LogDelay { total_us: 0 });

        assert_eq!(
            dht.measure(&mut line, SensorKind::Dht22),
            Ok(Reading::new(351, 652))
        );
        assert_eq!(line.writes.as_slice(), &[Level::Low, Level::High]);
        assert_eq!(line.direction, Direction::Input);
        assert_eq!(dht.delay.total_us, 1_000);
    }

    #[test]
    fn test_measure_dht11_start_signal() {
        let mut line = WireLine::answering(with_checksum([50, 0, 21, 0]));
        let mut dht = Dht::new(LogDelay { total_us: 0 });

        assert_eq!(
            dht.measure(&mut line, SensorKind::Dht11),
            Ok(Reading::new(210, 500))
        );
        assert_eq!(dht.delay.total_us, 18_000);
    }

    #[test]
    fn test_no_response() {
        let mut dht = Dht::new(LogDelay { total_us: 0 });
        assert_eq!(
            dht.measure(&mut WireLine::silent(), SensorKind::Dht11),
            Err(SensorError::NoResponse)
        );
    }

    #[test]
    fn test_truncated_transfer() {
        let mut line = WireLine::answering(with_checksum([50, 0, 21, 0]));
        for _ in 0..10 {
            line.pulses.pop_back();
        }
        let mut dht = Dht::new(LogDelay { total_us: 0 });
        assert_eq!(
            dht.measure(&mut line, SensorKind::Dht11),
            Err(SensorError::Timeout)
        );
    }
}
