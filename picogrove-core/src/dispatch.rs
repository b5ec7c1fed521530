//! Command dispatcher
//!
//! [`DeviceContext`] owns every piece of state that lives across
//! commands: the pin registry, open PWM channels, display handles and the
//! sensor cache. One line goes in, one [`Response`] comes out.

use picogrove_hal::{AnalogSampler, DigitalLine, Direction, Level, PwmProvider};
use picogrove_protocol::{parse_call, BusId, Command, LevelToken, PinMode, Reading, Response};

use crate::board::{Board, BoardParts};
use crate::config::Settings;
use crate::device::{
    measure_distance, DisplayAdapter, PwmCache, Registry, RegistryError, SensorAdapter,
};
use crate::error::{AdapterError, Error};
use crate::traits::SensorKind;

/// Look up a digital line for plain GPIO use
///
/// A pad left routed to PWM by `analogWrite` is taken back first, so the
/// line drives and samples the pin again.
fn claim_line<'a, L: DigitalLine, P: PwmProvider>(
    registry: &'a mut Registry<L>,
    pwm: &mut PwmCache<P>,
    pin: i64,
) -> Result<&'a mut L, AdapterError> {
    let line = registry.digital_mut(pin).ok_or(AdapterError::UnknownPin)?;
    if u8::try_from(pin).is_ok_and(|id| pwm.release(id)) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Pin {} taken back from PWM", pin);
        line.reclaim();
    }
    Ok(line)
}

/// Long-lived device state and command handlers
pub struct DeviceContext<B: Board> {
    registry: Registry<B::Line>,
    analog: B::Analog,
    pwm: PwmCache<B::Pwm>,
    displays: DisplayAdapter<B::Displays>,
    sensors: SensorAdapter<B::Probe>,
    delay: B::Delay,
    ranging_timeout_us: u32,
}

impl<B: Board> DeviceContext<B> {
    /// Take ownership of the board drivers
    ///
    /// Every digital line is switched to output and driven low.
    ///
    /// # Arguments
    /// - `parts`: Driver instances for the board
    /// - `settings`: Validated runtime settings
    pub fn new(parts: BoardParts<B>, settings: &Settings) -> Result<Self, RegistryError> {
        let registry = Registry::new(parts.digital, &parts.analog_pins)?;

        Ok(Self {
            registry,
            analog: parts.analog,
            pwm: PwmCache::new(parts.pwm, settings.pwm_frequency_hz),
            displays: DisplayAdapter::new(parts.displays, settings.display.enabled),
            sensors: SensorAdapter::new(parts.probe),
            delay: parts.delay,
            ranging_timeout_us: settings.ranging_timeout_us,
        })
    }

    pub fn registry_mut(&mut self) -> &mut Registry<B::Line> {
        &mut self.registry
    }

    pub fn pwm(&self) -> &PwmCache<B::Pwm> {
        &self.pwm
    }

    pub fn displays(&self) -> &DisplayAdapter<B::Displays> {
        &self.displays
    }

    pub fn sensors(&self) -> &SensorAdapter<B::Probe> {
        &self.sensors
    }

    fn line(&mut self, pin: i64) -> Result<&mut B::Line, AdapterError> {
        claim_line(&mut self.registry, &mut self.pwm, pin)
    }

    /// Set a digital pin's direction; analog pins accept and ignore it
    pub fn pin_mode(&mut self, pin: i64, mode: &str) -> Result<(), AdapterError> {
        if self.registry.is_analog(pin) {
            return Ok(());
        }
        if !self.registry.is_digital(pin) {
            return Err(AdapterError::UnknownPin);
        }

        let direction = match PinMode::from_token(mode).ok_or(AdapterError::UnknownMode)? {
            PinMode::Input => Direction::Input,
            PinMode::Output => Direction::Output,
        };
        self.line(pin)?.set_direction(direction);
        Ok(())
    }

    /// Drive a digital pin, switching it to output
    pub fn digital_write(&mut self, pin: i64, level: &str) -> Result<(), AdapterError> {
        if !self.registry.is_digital(pin) {
            return Err(AdapterError::UnknownPin);
        }
        let level = match LevelToken::from_token(level).ok_or(AdapterError::UnknownLevel)? {
            LevelToken::Low => Level::Low,
            LevelToken::High => Level::High,
        };
        let line = self.line(pin)?;

        // Latch the level before enabling the driver
        line.write(level);
        line.set_direction(Direction::Output);
        Ok(())
    }

    /// Read a digital pin, switching it to input
    pub fn digital_read(&mut self, pin: i64) -> Result<u8, AdapterError> {
        let line = self.line(pin)?;
        line.set_direction(Direction::Input);
        Ok(line.read().as_u8())
    }

    /// Sample an analog pin
    pub fn analog_read(&mut self, pin: i64) -> Result<u16, AdapterError> {
        let channel = self
            .registry
            .analog_channel(pin)
            .ok_or(AdapterError::UnknownPin)?;
        Ok(self.analog.read_u16(channel)?)
    }

    /// Set PWM output on a digital pin; `value` is clamped to 0-255
    pub fn analog_write(&mut self, pin: i64, value: i64) -> Result<(), AdapterError> {
        if !self.registry.is_digital(pin) {
            return Err(AdapterError::UnknownPin);
        }
        let pin = u8::try_from(pin).map_err(|_| AdapterError::UnknownPin)?;
        Ok(self.pwm.write(pin, value)?)
    }

    /// Measure distance in centimetres with an ultrasonic ranger on `pin`
    pub fn ultrasonic_read(&mut self, pin: i64) -> Result<u32, AdapterError> {
        let line = claim_line(&mut self.registry, &mut self.pwm, pin)?;
        Ok(measure_distance(
            line,
            &mut self.delay,
            self.ranging_timeout_us,
        )?)
    }

    pub fn set_text(&mut self, bus: BusId, text: &str) -> Result<(), AdapterError> {
        Ok(self.displays.set_text(bus, text)?)
    }

    pub fn set_rgb(
        &mut self,
        bus: BusId,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<(), AdapterError> {
        Ok(self.displays.set_rgb(bus, red, green, blue)?)
    }

    /// Read temperature and humidity from a DHT sensor on `pin`
    ///
    /// # Arguments
    /// - `pin`: Digital pin the sensor's data line is wired to
    /// - `module_type`: 0 for DHT11, 1 for DHT22
    pub fn dht_read(
        &mut self,
        pin: i64,
        module_type: i64,
    ) -> Result<Reading, AdapterError> {
        if !self.registry.is_digital(pin) {
            return Err(AdapterError::UnknownPin);
        }
        let kind = SensorKind::from_code(module_type).ok_or(AdapterError::UnknownModuleType)?;
        let id = u8::try_from(pin).map_err(|_| AdapterError::UnknownPin)?;
        let line = claim_line(&mut self.registry, &mut self.pwm, pin)?;
        Ok(self.sensors.read(id, line, kind)?)
    }

    /// Run a validated command against the devices
    pub fn execute(&mut self, command: &Command<'_>) -> Result<Response, AdapterError> {
        let response = match *command {
            Command::PinMode { pin, mode } => {
                self.pin_mode(pin, mode)?;
                Response::Ack
            }
            Command::DigitalWrite { pin, level } => {
                self.digital_write(pin, level)?;
                Response::Ack
            }
            Command::DigitalRead { pin } => Response::Level(self.digital_read(pin)?),
            Command::AnalogRead { pin } => Response::Sample(self.analog_read(pin)?),
            Command::AnalogWrite { pin, value } => {
                self.analog_write(pin, value)?;
                Response::Ack
            }
            Command::UltrasonicRead { pin } => Response::Distance(self.ultrasonic_read(pin)?),
            Command::SetText { bus, text } => {
                self.set_text(bus, text)?;
                Response::Ack
            }
            Command::SetRgb {
                bus,
                red,
                green,
                blue,
            } => {
                self.set_rgb(bus, red, green, blue)?;
                Response::Ack
            }
            Command::DhtRead { pin, module_type } => {
                Response::Reading(self.dht_read(pin, module_type)?)
            }
        };
        Ok(response)
    }

    /// Parse, validate and run one command line
    pub fn process(&mut self, line: &str) -> Result<Response, Error> {
        let call = parse_call(line)?;
        let command = Command::from_call(&call)?;
        Ok(self.execute(&command)?)
    }

    /// Handle one command line, collapsing every failure to [`Response::Error`]
    pub fn handle_line(&mut self, line: &str) -> Response {
        #[cfg(feature = "defmt")]
        defmt::debug!("> {}", line);

        match self.process(line) {
            Ok(response) => response,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Command failed: {}", _e);
                Response::Error
            }
        }
    }
}
