//! Reply lines and sensor readings.
//!
//! Every command produces exactly one reply line: an empty line for
//! commands without a result, a decimal number, two decimals separated by
//! a space for sensor readings, or the literal `error`.

use core::fmt;

use crate::command::ReplyKind;
use crate::error::ReplyError;

/// Reply line for any failure
pub const ERROR_REPLY: &str = "error";

/// Longest reply line including the terminator
pub const MAX_RESPONSE_LEN: usize = 24;

/// Temperature and relative humidity from a humidity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature in 0.1°C units (e.g., 235 = 23.5°C)
    pub temperature_x10: i16,
    /// Relative humidity in 0.1% units
    pub humidity_x10: u16,
}

impl Reading {
    /// Create a reading from tenths
    pub const fn new(temperature_x10: i16, humidity_x10: u16) -> Self {
        Self {
            temperature_x10,
            humidity_x10,
        }
    }

    /// Whether the values are physically sensible for a DHT-class sensor
    ///
    /// Temperature strictly between -100°C and 150°C, humidity 0–100%.
    pub fn is_plausible(&self) -> bool {
        self.temperature_x10 > -1000 && self.temperature_x10 < 1500 && self.humidity_x10 <= 1000
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tenths(f, self.temperature_x10 as i32)?;
        f.write_str(" ")?;
        write_tenths(f, self.humidity_x10 as i32)
    }
}

/// Write a tenths value with exactly one decimal (`-0.5`, `23.0`)
fn write_tenths(f: &mut fmt::Formatter<'_>, value: i32) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    write!(f, "{}{}.{}", sign, magnitude / 10, magnitude % 10)
}

/// Parse a decimal such as `23`, `23.4` or `-0.55` into tenths
///
/// Digits past the first decimal round half away from zero.
fn parse_tenths(token: &str) -> Option<i32> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || !is_digits(frac_part) {
        return None;
    }

    let mut tenths: i32 = 0;
    for b in int_part.bytes() {
        tenths = tenths.checked_mul(10)?.checked_add((b - b'0') as i32)?;
    }
    tenths = tenths.checked_mul(10)?;

    let mut frac = frac_part.bytes();
    if let Some(b) = frac.next() {
        tenths += (b - b'0') as i32;
    }
    if let Some(b) = frac.next() {
        if b >= b'5' {
            tenths += 1;
        }
    }

    Some(if negative { -tenths } else { tenths })
}

/// One reply line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Success without a value
    Ack,
    /// Digital level (0 or 1)
    Level(u8),
    /// Raw 16-bit analog sample
    Sample(u16),
    /// Distance in centimetres
    Distance(u32),
    /// Temperature and humidity
    Reading(Reading),
    /// Any failure
    Error,
}

impl Response {
    /// Decode a reply line received for a command with reply shape `kind`
    ///
    /// Surrounding whitespace (including the terminator) is ignored.
    /// `error` always decodes to [`ReplyError::Device`].
    pub fn decode(kind: ReplyKind, line: &str) -> Result<Self, ReplyError> {
        let line = line.trim();
        if line == ERROR_REPLY {
            return Err(ReplyError::Device);
        }

        match kind {
            ReplyKind::Ack => {
                if line.is_empty() {
                    Ok(Response::Ack)
                } else {
                    Err(ReplyError::Malformed)
                }
            }
            ReplyKind::Level => {
                let value: i64 = line.parse().map_err(|_| ReplyError::Malformed)?;
                Ok(Response::Level(u8::from(value != 0)))
            }
            ReplyKind::Sample => line
                .parse()
                .map(Response::Sample)
                .map_err(|_| ReplyError::Malformed),
            ReplyKind::Distance => line
                .parse()
                .map(Response::Distance)
                .map_err(|_| ReplyError::Malformed),
            ReplyKind::Reading => {
                let mut parts = line.split_whitespace();
                let temperature = parts.next().and_then(parse_tenths);
                let humidity = parts.next().and_then(parse_tenths);
                match (temperature, humidity, parts.next()) {
                    (Some(t), Some(h), None) => Ok(Response::Reading(Reading::new(
                        i16::try_from(t).map_err(|_| ReplyError::Malformed)?,
                        u16::try_from(h).map_err(|_| ReplyError::Malformed)?,
                    ))),
                    _ => Err(ReplyError::Malformed),
                }
            }
        }
    }
}

/// Writes the full reply line, terminator included
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ack => {}
            Response::Level(level) => write!(f, "{}", level)?,
            Response::Sample(sample) => write!(f, "{}", sample)?,
            Response::Distance(cm) => write!(f, "{}", cm)?,
            Response::Reading(reading) => write!(f, "{}", reading)?,
            Response::Error => f.write_str(ERROR_REPLY)?,
        }
        f.write_str("\n")
    }
}
