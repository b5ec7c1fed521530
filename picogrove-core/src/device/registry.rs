//! Pin registry
//!
//! Maps protocol pin numbers to the digital lines and analog channels
//! wired on the board. The two sets are fixed at startup and must not
//! overlap, otherwise a pin number would be ambiguous.

use heapless::Vec;
use picogrove_hal::{DigitalLine, Direction, Level};

/// Maximum digital pins per board
pub const MAX_DIGITAL_PINS: usize = 8;

/// Maximum analog pins per board
pub const MAX_ANALOG_PINS: usize = 4;

/// Errors building a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Pin number appears twice in one set
    Duplicate(u8),
    /// Pin number is both digital and analog
    Overlap(u8),
    /// More pins than the registry holds
    TooManyPins,
}

/// Analog pin wiring: protocol number and converter channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogPin {
    /// Pin number used on the wire
    pub id: u8,
    /// Converter channel sampled for this pin
    pub channel: u8,
}

impl AnalogPin {
    pub const fn new(id: u8, channel: u8) -> Self {
        Self { id, channel }
    }
}

/// Digital lines and analog channels by pin number
pub struct Registry<L> {
    digital: Vec<(u8, L), MAX_DIGITAL_PINS>,
    analog: Vec<AnalogPin, MAX_ANALOG_PINS>,
}

impl<L: DigitalLine> Registry<L> {
    /// Build a registry and put every digital line in its initial state
    /// (output, driven low)
    ///
    /// # Arguments
    /// - `digital`: Digital lines with their pin numbers
    /// - `analog`: Analog pin wiring
    pub fn new(
        digital: impl IntoIterator<Item = (u8, L)>,
        analog: &[AnalogPin],
    ) -> Result<Self, RegistryError> {
        let mut registry = Self {
            digital: Vec::new(),
            analog: Vec::new(),
        };

        for pin in analog {
            if registry.analog.iter().any(|a| a.id == pin.id) {
                return Err(RegistryError::Duplicate(pin.id));
            }
            registry
                .analog
                .push(*pin)
                .map_err(|_| RegistryError::TooManyPins)?;
        }

        for (id, mut line) in digital {
            if registry.is_analog(id as i64) {
                return Err(RegistryError::Overlap(id));
            }
            if registry.digital.iter().any(|(existing, _)| *existing == id) {
                return Err(RegistryError::Duplicate(id));
            }
            line.write(Level::Low);
            line.set_direction(Direction::Output);
            registry
                .digital
                .push((id, line))
                .map_err(|_| RegistryError::TooManyPins)?;
        }

        Ok(registry)
    }
}

impl<L> Registry<L> {
    /// Digital line for a pin number
    pub fn digital_mut(&mut self, id: i64) -> Option<&mut L> {
        self.digital
            .iter_mut()
            .find(|(pin, _)| *pin as i64 == id)
            .map(|(_, line)| line)
    }

    /// Whether `id` names a digital pin
    pub fn is_digital(&self, id: i64) -> bool {
        self.digital.iter().any(|(pin, _)| *pin as i64 == id)
    }

    /// Converter channel for an analog pin number
    pub fn analog_channel(&self, id: i64) -> Option<u8> {
        self.analog
            .iter()
            .find(|pin| pin.id as i64 == id)
            .map(|pin| pin.channel)
    }

    /// Whether `id` names an analog pin
    pub fn is_analog(&self, id: i64) -> bool {
        self.analog_channel(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct MockLine {
        direction: Option<Direction>,
        level: Option<Level>,
    }

    impl DigitalLine for MockLine {
        fn set_direction(&mut self, direction: Direction) {
            self.direction = Some(direction);
        }

        fn direction(&self) -> Direction {
            self.direction.unwrap_or(Direction::Input)
        }

        fn write(&mut self, level: Level) {
            self.level = Some(level);
        }

        fn read(&mut self) -> Level {
            self.level.unwrap_or(Level::Low)
        }
    }

    const ANALOG: [AnalogPin; 3] = [
        AnalogPin::new(0, 0),
        AnalogPin::new(1, 1),
        AnalogPin::new(2, 2),
    ];

    fn lines(ids: &[u8]) -> Vec<(u8, MockLine), MAX_DIGITAL_PINS> {
        ids.iter().map(|&id| (id, MockLine::default())).collect()
    }

    #[test]
    fn test_lookup() {
        let mut registry = Registry::new(lines(&[16, 18, 20]), &ANALOG).unwrap();

        assert!(registry.is_digital(16));
        assert!(!registry.is_digital(17));
        assert!(registry.digital_mut(20).is_some());
        assert!(registry.digital_mut(0).is_none());

        assert_eq!(registry.analog_channel(1), Some(1));
        assert_eq!(registry.analog_channel(16), None);
        assert!(registry.is_analog(2));
        assert!(!registry.is_analog(-1));
    }

    #[test]
    fn test_initial_state_output_low() {
        let mut registry = Registry::new(lines(&[16]), &ANALOG).unwrap();
        let line = registry.digital_mut(16).unwrap();
        assert_eq!(line.direction, Some(Direction::Output));
        assert_eq!(line.level, Some(Level::Low));
    }

    #[test]
    fn test_rejects_overlap() {
        let result = Registry::new(lines(&[16, 2]), &ANALOG);
        assert!(matches!(result, Err(RegistryError::Overlap(2))));
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = Registry::new(lines(&[16, 16]), &ANALOG);
        assert!(matches!(result, Err(RegistryError::Duplicate(16))));

        let analog = [AnalogPin::new(0, 0), AnalogPin::new(0, 1)];
        let result = Registry::new(lines(&[16]), &analog);
        assert!(matches!(result, Err(RegistryError::Duplicate(0))));
    }

    #[test]
    fn test_rejects_too_many() {
        let ids: [u8; MAX_DIGITAL_PINS + 1] = core::array::from_fn(|i| 10 + i as u8);
        let digital = ids.into_iter().map(|id| (id, MockLine::default()));
        let result = Registry::new(digital, &[]);
        assert!(matches!(result, Err(RegistryError::TooManyPins)));
    }
}
