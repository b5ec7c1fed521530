//! Picogrove serial command protocol
//!
//! This crate defines the line-oriented text protocol between a host
//! (Raspberry Pi, PC) and the Pico running the command server. Command
//! names follow the GrovePi API so existing host code maps onto it
//! directly.
//!
//! # Protocol Overview
//!
//! Every request is one line, every reply is one line:
//! ```text
//! host → pico:  digitalWrite(16, HIGH)\n      pico → host:  \n
//! host → pico:  analogRead(0)\n               pico → host:  31245\n
//! host → pico:  dhtRead(18, 0)\n              pico → host:  23.0 45.0\n
//! host → pico:  bogus\n                       pico → host:  error\n
//! ```
//!
//! Received characters are never echoed. The device answers each line
//! before reading the next one.

#![no_std]
#![deny(unsafe_code)]

pub mod call;
pub mod command;
pub mod error;
pub mod line;
pub mod response;

pub use call::{expect_args, parse_call, parse_int, split_args, Call, SplitMode};
pub use command::{BusId, Command, LevelToken, PinMode, ReplyKind};
pub use error::{FramingError, ReplyError, ValidationError};
pub use line::{Line, LineParser, LINE_END, MAX_LINE_LEN};
pub use response::{Reading, Response, ERROR_REPLY, MAX_RESPONSE_LEN};
