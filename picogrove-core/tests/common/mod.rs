//! Mock board shared by the integration tests
//!
//! Every driver logs into shared state so tests can inspect what the
//! device context did after handing the drivers over.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use picogrove_core::config::Settings;
use picogrove_core::device::AnalogPin;
use picogrove_core::traits::{
    CharacterDisplay, DisplayError, DisplayProvider, HumidityProbe, RgbBacklight, SensorError,
    SensorKind,
};
use picogrove_core::{Board, BoardParts, DeviceContext};
use picogrove_hal::{
    AdcError, AnalogSampler, DigitalLine, Direction, Level, OutputPin, PulseError, PulseIn,
    PwmError, PwmOutput, PwmProvider,
};
use picogrove_protocol::{BusId, Reading};

pub const DIGITAL_PINS: [u8; 3] = [16, 18, 20];
pub const ANALOG_PINS: [AnalogPin; 3] = [
    AnalogPin::new(0, 0),
    AnalogPin::new(1, 1),
    AnalogPin::new(2, 2),
];

/// Digital line with a loopback input and a scripted echo
#[derive(Debug)]
pub struct MockLine {
    pub direction: Direction,
    pub driven: Level,
    /// Level seen by reads; follows the driven level when `None`
    pub external: Option<Level>,
    pub echo: Result<u32, PulseError>,
    pub writes: Vec<Level>,
    /// Times the pad was taken back from another function
    pub reclaims: u32,
}

impl Default for MockLine {
    fn default() -> Self {
        Self {
            direction: Direction::Input,
            driven: Level::High,
            external: None,
            echo: Err(PulseError::Timeout),
            writes: Vec::new(),
            reclaims: 0,
        }
    }
}

impl DigitalLine for MockLine {
    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn write(&mut self, level: Level) {
        self.driven = level;
        self.writes.push(level);
    }

    fn read(&mut self) -> Level {
        self.external.unwrap_or(self.driven)
    }

    fn reclaim(&mut self) {
        self.reclaims += 1;
    }
}

impl PulseIn for MockLine {
    fn pulse_in(&mut self, _level: Level, _timeout_us: u32) -> Result<u32, PulseError> {
        self.echo
    }
}

pub struct MockAnalog {
    pub samples: [u16; 4],
}

impl AnalogSampler for MockAnalog {
    fn read_u16(&mut self, channel: u8) -> Result<u16, AdcError> {
        self.samples
            .get(channel as usize)
            .copied()
            .ok_or(AdcError::InvalidChannel)
    }
}

#[derive(Debug, Default)]
pub struct PwmLog {
    pub opened: Vec<(u8, u32)>,
    pub duties: Vec<(u8, u16)>,
    pub attaches: Vec<u8>,
}

pub struct MockPwmChannel {
    pin: u8,
    log: Rc<RefCell<PwmLog>>,
}

impl PwmOutput for MockPwmChannel {
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), PwmError> {
        self.log.borrow_mut().duties.push((self.pin, duty));
        Ok(())
    }

    fn attach(&mut self) -> Result<(), PwmError> {
        self.log.borrow_mut().attaches.push(self.pin);
        Ok(())
    }
}

pub struct MockPwm {
    log: Rc<RefCell<PwmLog>>,
}

impl PwmProvider for MockPwm {
    type Channel = MockPwmChannel;

    fn open(&mut self, pin: u8, frequency_hz: u32) -> Result<Self::Channel, PwmError> {
        self.log.borrow_mut().opened.push((pin, frequency_hz));
        Ok(MockPwmChannel {
            pin,
            log: self.log.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    Home,
    Cursor(u8, u8),
    Write(String),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Default)]
pub struct DisplayLog {
    pub opens: Vec<BusId>,
    pub ops: Vec<(BusId, DisplayOp)>,
    /// Buses reporting a missing driver
    pub missing: Vec<BusId>,
    pub with_backlight: bool,
    pub fail_clear: bool,
}

impl DisplayLog {
    pub fn ops_on(&self, bus: BusId) -> Vec<DisplayOp> {
        self.ops
            .iter()
            .filter(|(b, _)| *b == bus)
            .map(|(_, op)| op.clone())
            .collect()
    }
}

pub struct MockBacklight {
    bus: BusId,
    log: Rc<RefCell<DisplayLog>>,
}

impl RgbBacklight for MockBacklight {
    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<(), DisplayError> {
        self.log
            .borrow_mut()
            .ops
            .push((self.bus, DisplayOp::Rgb(red, green, blue)));
        Ok(())
    }
}

pub struct MockDisplay {
    bus: BusId,
    log: Rc<RefCell<DisplayLog>>,
    backlight: Option<MockBacklight>,
}

impl MockDisplay {
    fn record(&self, op: DisplayOp) {
        self.log.borrow_mut().ops.push((self.bus, op));
    }
}

impl CharacterDisplay for MockDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.log.borrow().fail_clear {
            return Err(DisplayError::Bus);
        }
        self.record(DisplayOp::Clear);
        Ok(())
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        self.record(DisplayOp::Home);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.record(DisplayOp::Cursor(col, row));
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.record(DisplayOp::Write(text.into()));
        Ok(())
    }

    fn backlight(&mut self) -> Option<&mut dyn RgbBacklight> {
        self.backlight
            .as_mut()
            .map(|backlight| backlight as &mut dyn RgbBacklight)
    }
}

pub struct MockDisplays {
    log: Rc<RefCell<DisplayLog>>,
}

impl DisplayProvider for MockDisplays {
    type Display = MockDisplay;

    fn open(&mut self, bus: BusId) -> Result<Self::Display, DisplayError> {
        let mut log = self.log.borrow_mut();
        log.opens.push(bus);
        if log.missing.contains(&bus) {
            return Err(DisplayError::Unavailable);
        }
        let backlight = log.with_backlight.then(|| MockBacklight {
            bus,
            log: self.log.clone(),
        });
        Ok(MockDisplay {
            bus,
            log: self.log.clone(),
            backlight,
        })
    }
}

#[derive(Debug, Default)]
pub struct ProbeScript {
    pub results: VecDeque<Result<Reading, SensorError>>,
    pub calls: Vec<SensorKind>,
}

pub struct MockProbe {
    script: Rc<RefCell<ProbeScript>>,
}

impl HumidityProbe<MockLine> for MockProbe {
    fn measure(&mut self, _line: &mut MockLine, kind: SensorKind) -> Result<Reading, SensorError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(kind);
        script
            .results
            .pop_front()
            .unwrap_or(Err(SensorError::NoResponse))
    }
}

pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

pub struct MockBoard;

impl Board for MockBoard {
    type Line = MockLine;
    type Analog = MockAnalog;
    type Pwm = MockPwm;
    type Displays = MockDisplays;
    type Probe = MockProbe;
    type Delay = NoopDelay;
}

/// Handles onto the shared driver state
pub struct Handles {
    pub pwm: Rc<RefCell<PwmLog>>,
    pub display: Rc<RefCell<DisplayLog>>,
    pub probe: Rc<RefCell<ProbeScript>>,
}

pub fn context() -> (DeviceContext<MockBoard>, Handles) {
    context_with(&Settings::DEFAULT)
}

pub fn context_with(settings: &Settings) -> (DeviceContext<MockBoard>, Handles) {
    let handles = Handles {
        pwm: Rc::new(RefCell::new(PwmLog::default())),
        display: Rc::new(RefCell::new(DisplayLog {
            with_backlight: true,
            ..DisplayLog::default()
        })),
        probe: Rc::new(RefCell::new(ProbeScript::default())),
    };

    let parts = BoardParts {
        digital: DIGITAL_PINS
            .iter()
            .map(|&id| (id, MockLine::default()))
            .collect(),
        analog_pins: ANALOG_PINS.iter().copied().collect(),
        analog: MockAnalog {
            samples: [0, 31245, 65535, 7],
        },
        pwm: MockPwm {
            log: handles.pwm.clone(),
        },
        displays: MockDisplays {
            log: handles.display.clone(),
        },
        probe: MockProbe {
            script: handles.probe.clone(),
        },
        delay: NoopDelay,
    };

    let ctx = DeviceContext::new(parts, settings).unwrap();
    (ctx, handles)
}

/// Activity LED recording every transition
#[derive(Clone, Default)]
pub struct MockLed {
    pub transitions: Rc<RefCell<Vec<bool>>>,
    high: bool,
}

impl OutputPin for MockLed {
    fn set_high(&mut self) {
        self.high = true;
        self.transitions.borrow_mut().push(true);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.transitions.borrow_mut().push(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
