//! Grove Shield for Pi Pico v1.0 wiring
//!
//! | Port  | Signal              |
//! |-------|---------------------|
//! | D16   | GP16                |
//! | D18   | GP18                |
//! | D20   | GP20                |
//! | A0-A2 | GP26-GP28 (ADC0-2)  |
//! | I2C0  | SDA GP8, SCL GP9    |
//! | I2C1  | SDA GP6, SCL GP7    |
//! | UART0 | TX GP0, RX GP1      |
//!
//! UART0 is the host link and needs an external USB-UART adapter.
//! The on-board LED (GP25) shows command activity.

use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::i2c::{Blocking, Config as I2cConfig, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, PIN_0, PIN_1, UART0};
use embassy_rp::{Peri, Peripherals};
use heapless::Vec;

use picogrove_core::config::Settings;
use picogrove_core::device::registry::MAX_DIGITAL_PINS;
use picogrove_core::device::AnalogPin;
use picogrove_core::{Board, BoardParts};
use picogrove_drivers::display::GroveLcdProvider;
use picogrove_drivers::sensor::Dht;
use picogrove_hal_rp2040::{BlockingDelay, GroveAdc, GroveLine, GrovePwm, StatusLed};

/// Wire pin number and ADC channel of each analog port
const ANALOG_PINS: [AnalogPin; 3] = [
    AnalogPin::new(0, 0),
    AnalogPin::new(1, 1),
    AnalogPin::new(2, 2),
];

pub type DisplayBus0 = I2c<'static, I2C0, Blocking>;
pub type DisplayBus1 = I2c<'static, I2C1, Blocking>;

/// Driver types for the shield
pub struct PicoBoard;

impl Board for PicoBoard {
    type Line = GroveLine;
    type Analog = GroveAdc;
    type Pwm = GrovePwm;
    type Displays = GroveLcdProvider<DisplayBus0, DisplayBus1, BlockingDelay>;
    type Probe = Dht<BlockingDelay>;
    type Delay = BlockingDelay;
}

/// Peripherals the command server does not own
pub struct Link {
    pub uart: Peri<'static, UART0>,
    pub tx: Peri<'static, PIN_0>,
    pub rx: Peri<'static, PIN_1>,
}

/// Split the chip into the board parts, the status LED and the host link
pub fn split(p: Peripherals, settings: &Settings) -> (BoardParts<PicoBoard>, StatusLed, Link) {
    let digital: Vec<_, MAX_DIGITAL_PINS> = [
        (16, GroveLine::new(p.PIN_16.into())),
        (18, GroveLine::new(p.PIN_18.into())),
        (20, GroveLine::new(p.PIN_20.into())),
    ]
    .into_iter()
    .collect();

    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let analog = GroveAdc::new(
        adc,
        [
            Channel::new_pin(p.PIN_26, Pull::None),
            Channel::new_pin(p.PIN_27, Pull::None),
            Channel::new_pin(p.PIN_28, Pull::None),
        ],
    );

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = settings.i2c_frequency_hz;
    let bus0 = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c_config.clone());
    let bus1 = I2c::new_blocking(p.I2C1, p.PIN_7, p.PIN_6, i2c_config);

    let parts = BoardParts {
        digital,
        analog_pins: ANALOG_PINS.into_iter().collect(),
        analog,
        pwm: GrovePwm::new(p.PWM_SLICE0, p.PWM_SLICE1, p.PWM_SLICE2),
        displays: GroveLcdProvider::new(
            Some(bus0),
            Some(bus1),
            BlockingDelay,
            settings.display.backlight,
        ),
        probe: Dht::new(BlockingDelay),
        delay: BlockingDelay,
    };

    let led = StatusLed::new(Output::new(p.PIN_25, Level::Low));

    let link = Link {
        uart: p.UART0,
        tx: p.PIN_0,
        rx: p.PIN_1,
    };

    (parts, led, link)
}
