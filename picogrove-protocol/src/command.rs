//! Typed commands and their wire tokens.
//!
//! Commands keep mode and level tokens as received: whether a token is
//! valid can depend on the pin it is applied to, so that decision belongs
//! to the device layer. Integer arguments and the bus token are validated
//! here.

use core::fmt::{self, Write};

use crate::call::{expect_args, parse_int, Call, SplitMode};
use crate::error::ValidationError;

/// I2C bus selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusId {
    /// First I2C bus
    I2c0,
    /// Second I2C bus
    I2c1,
}

impl BusId {
    /// Parse a bus token (`0`, `1`, `i2c0`, `i2c1`, any case)
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token == "0" || token.eq_ignore_ascii_case("i2c0") {
            Some(BusId::I2c0)
        } else if token == "1" || token.eq_ignore_ascii_case("i2c1") {
            Some(BusId::I2c1)
        } else {
            None
        }
    }

    /// Zero-based bus index
    pub fn index(self) -> usize {
        match self {
            BusId::I2c0 => 0,
            BusId::I2c1 => 1,
        }
    }
}

/// Pin direction token accepted by `pinMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

impl PinMode {
    /// Parse `in`/`input`/`out`/`output`, any case
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("in") || token.eq_ignore_ascii_case("input") {
            Some(PinMode::Input)
        } else if token.eq_ignore_ascii_case("out") || token.eq_ignore_ascii_case("output") {
            Some(PinMode::Output)
        } else {
            None
        }
    }

    /// Token sent by host libraries
    pub fn as_token(self) -> &'static str {
        match self {
            PinMode::Input => "INPUT",
            PinMode::Output => "OUTPUT",
        }
    }
}

/// Level token accepted by `digitalWrite`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelToken {
    Low,
    High,
}

impl LevelToken {
    /// Parse `high`/`low`, any case
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("high") {
            Some(LevelToken::High)
        } else if token.eq_ignore_ascii_case("low") {
            Some(LevelToken::Low)
        } else {
            None
        }
    }

    /// Token sent by host libraries
    pub fn as_token(self) -> &'static str {
        match self {
            LevelToken::Low => "LOW",
            LevelToken::High => "HIGH",
        }
    }
}

/// Shape of the success reply a command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyKind {
    /// Empty line
    Ack,
    /// `0` or `1`
    Level,
    /// Raw 16-bit sample
    Sample,
    /// Distance in centimetres
    Distance,
    /// Temperature and humidity
    Reading,
}

/// A validated command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// `pinMode(pin, mode)`
    PinMode { pin: i64, mode: &'a str },
    /// `digitalWrite(pin, value)`
    DigitalWrite { pin: i64, level: &'a str },
    /// `digitalRead(pin)`
    DigitalRead { pin: i64 },
    /// `analogRead(pin)`
    AnalogRead { pin: i64 },
    /// `analogWrite(pin, value)`
    AnalogWrite { pin: i64, value: i64 },
    /// `ultrasonicRead(pin)`
    UltrasonicRead { pin: i64 },
    /// `setText(bus, text)`
    SetText { bus: BusId, text: &'a str },
    /// `setRGB(bus, r, g, b)`
    SetRgb {
        bus: BusId,
        red: i64,
        green: i64,
        blue: i64,
    },
    /// `dhtRead(pin, module_type)`
    DhtRead { pin: i64, module_type: i64 },
}

impl<'a> Command<'a> {
    /// Validate a parsed call
    ///
    /// The name is matched case-insensitively and the argument count must
    /// match exactly.
    pub fn from_call(call: &Call<'a>) -> Result<Self, ValidationError> {
        let name = call.name;
        let args = call.args;

        if name.eq_ignore_ascii_case("pinmode") {
            let [pin, mode] = expect_args::<2>(args, SplitMode::All)?;
            Ok(Command::PinMode {
                pin: parse_int(pin)?,
                mode,
            })
        } else if name.eq_ignore_ascii_case("digitalwrite") {
            let [pin, level] = expect_args::<2>(args, SplitMode::All)?;
            Ok(Command::DigitalWrite {
                pin: parse_int(pin)?,
                level,
            })
        } else if name.eq_ignore_ascii_case("digitalread") {
            let [pin] = expect_args::<1>(args, SplitMode::All)?;
            Ok(Command::DigitalRead {
                pin: parse_int(pin)?,
            })
        } else if name.eq_ignore_ascii_case("analogread") {
            let [pin] = expect_args::<1>(args, SplitMode::All)?;
            Ok(Command::AnalogRead {
                pin: parse_int(pin)?,
            })
        } else if name.eq_ignore_ascii_case("analogwrite") {
            let [pin, value] = expect_args::<2>(args, SplitMode::All)?;
            Ok(Command::AnalogWrite {
                pin: parse_int(pin)?,
                value: parse_int(value)?,
            })
        } else if name.eq_ignore_ascii_case("ultrasonicread") {
            let [pin] = expect_args::<1>(args, SplitMode::All)?;
            Ok(Command::UltrasonicRead {
                pin: parse_int(pin)?,
            })
        } else if name.eq_ignore_ascii_case("settext") {
            let [bus, text] = expect_args::<2>(args, SplitMode::FirstComma)?;
            Ok(Command::SetText {
                bus: BusId::from_token(bus).ok_or(ValidationError::UnknownBus)?,
                text,
            })
        } else if name.eq_ignore_ascii_case("setrgb") {
            let [bus, red, green, blue] = expect_args::<4>(args, SplitMode::All)?;
            Ok(Command::SetRgb {
                bus: BusId::from_token(bus).ok_or(ValidationError::UnknownBus)?,
                red: parse_int(red)?,
                green: parse_int(green)?,
                blue: parse_int(blue)?,
            })
        } else if name.eq_ignore_ascii_case("dhtread") {
            let [pin, module_type] = expect_args::<2>(args, SplitMode::All)?;
            Ok(Command::DhtRead {
                pin: parse_int(pin)?,
                module_type: parse_int(module_type)?,
            })
        } else {
            Err(ValidationError::UnknownCommand)
        }
    }

    /// Shape of the success reply
    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            Command::PinMode { .. }
            | Command::DigitalWrite { .. }
            | Command::AnalogWrite { .. }
            | Command::SetText { .. }
            | Command::SetRgb { .. } => ReplyKind::Ack,
            Command::DigitalRead { .. } => ReplyKind::Level,
            Command::AnalogRead { .. } => ReplyKind::Sample,
            Command::UltrasonicRead { .. } => ReplyKind::Distance,
            Command::DhtRead { .. } => ReplyKind::Reading,
        }
    }

    /// Write the command as a request line, including the terminator
    ///
    /// Carriage returns and line feeds in `setText` text are sent as
    /// spaces so the text cannot split the line.
    pub fn write_line<W: Write>(&self, out: &mut W) -> fmt::Result {
        match *self {
            Command::PinMode { pin, mode } => write!(out, "pinMode({}, {})", pin, mode)?,
            Command::DigitalWrite { pin, level } => {
                write!(out, "digitalWrite({}, {})", pin, level)?
            }
            Command::DigitalRead { pin } => write!(out, "digitalRead({})", pin)?,
            Command::AnalogRead { pin } => write!(out, "analogRead({})", pin)?,
            Command::AnalogWrite { pin, value } => {
                write!(out, "analogWrite({}, {})", pin, value)?
            }
            Command::UltrasonicRead { pin } => write!(out, "ultrasonicRead({})", pin)?,
            Command::SetText { bus, text } => {
                write!(out, "setText({}, ", bus.index())?;
                for ch in text.chars() {
                    out.write_char(if ch == '\r' || ch == '\n' { ' ' } else { ch })?;
                }
                out.write_char(')')?;
            }
            Command::SetRgb {
                bus,
                red,
                green,
                blue,
            } => write!(
                out,
                "setRGB({}, {}, {}, {})",
                bus.index(),
                red,
                green,
                blue
            )?,
            Command::DhtRead { pin, module_type } => {
                write!(out, "dhtRead({}, {})", pin, module_type)?
            }
        }
        out.write_char('\n')
    }
}
