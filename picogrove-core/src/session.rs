//! Serial session loop
//!
//! Reads the host stream one line at a time, hands each line to the
//! [`DeviceContext`] and writes the reply before reading further. Bytes
//! received after a complete line stay buffered for the next call.

use core::fmt::Write as _;

use embedded_io::{Error as _, ErrorKind};
use embedded_io_async::{Read, Write};
use heapless::String;
use picogrove_hal::OutputPin;
use picogrove_protocol::{LineParser, Response, MAX_RESPONSE_LEN};

use crate::board::Board;
use crate::dispatch::DeviceContext;

/// Receive buffer size
const RX_BUF_SIZE: usize = 64;

/// Errors that end a call to [`Session::serve_next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Input stream reached end of file
    Closed,
    /// Reading from the host failed
    Read(ErrorKind),
    /// Writing the reply failed
    Write(ErrorKind),
}

/// Holds the activity indicator on while alive
pub struct ActivityGuard<'a, P: OutputPin> {
    pin: &'a mut P,
}

impl<'a, P: OutputPin> ActivityGuard<'a, P> {
    pub fn new(pin: &'a mut P) -> Self {
        pin.set_high();
        Self { pin }
    }
}

impl<P: OutputPin> Drop for ActivityGuard<'_, P> {
    fn drop(&mut self) {
        self.pin.set_low();
    }
}

/// Line-at-a-time request/response loop over a byte stream
pub struct Session<P: OutputPin> {
    parser: LineParser,
    indicator: P,
    rx_buf: [u8; RX_BUF_SIZE],
    rx_start: usize,
    rx_end: usize,
}

impl<P: OutputPin> Session<P> {
    /// Create a session driving `indicator` while a command is handled
    pub fn new(mut indicator: P) -> Self {
        indicator.set_low();
        Self {
            parser: LineParser::new(),
            indicator,
            rx_buf: [0; RX_BUF_SIZE],
            rx_start: 0,
            rx_end: 0,
        }
    }

    pub fn indicator(&self) -> &P {
        &self.indicator
    }

    /// Read one line, run it and write the reply
    ///
    /// Returns the reply that was sent.
    ///
    /// # Arguments
    /// - `ctx`: Device state the command runs against
    /// - `rx`: Host to device stream
    /// - `tx`: Device to host stream
    pub async fn serve_next<B, R, W>(
        &mut self,
        ctx: &mut DeviceContext<B>,
        rx: &mut R,
        tx: &mut W,
    ) -> Result<Response, SessionError>
    where
        B: Board,
        R: Read,
        W: Write,
    {
        loop {
            if self.rx_start == self.rx_end {
                let n = rx.read(&mut self.rx_buf).await.map_err(|e| {
                    // Partial line is unrecoverable after a receive fault
                    self.parser.reset();
                    SessionError::Read(e.kind())
                })?;
                if n == 0 {
                    return Err(SessionError::Closed);
                }
                self.rx_start = 0;
                self.rx_end = n;
            }

            let (used, framed) = self
                .parser
                .feed_bytes(&self.rx_buf[self.rx_start..self.rx_end]);
            self.rx_start += used;

            let Some(framed) = framed.transpose() else {
                continue;
            };

            // Rejected lines still count as activity
            let response = {
                let _active = ActivityGuard::new(&mut self.indicator);
                match framed {
                    Ok(line) => ctx.handle_line(&line),
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("Dropped line: {}", _e);
                        Response::Error
                    }
                }
            };

            send(tx, &response).await?;
            return Ok(response);
        }
    }

    /// Serve lines until the stream closes or fails to write
    ///
    /// Read faults are logged and the loop continues with a fresh line.
    pub async fn run<B, R, W>(
        &mut self,
        ctx: &mut DeviceContext<B>,
        rx: &mut R,
        tx: &mut W,
    ) -> SessionError
    where
        B: Board,
        R: Read,
        W: Write,
    {
        loop {
            match self.serve_next(ctx, rx, tx).await {
                Ok(_) => {}
                Err(SessionError::Read(_kind)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Serial read error: {}", _kind);
                }
                Err(e) => return e,
            }
        }
    }
}

/// Write one reply line and flush it
async fn send<W: Write>(tx: &mut W, response: &Response) -> Result<(), SessionError> {
    let mut out: String<MAX_RESPONSE_LEN> = String::new();
    if write!(out, "{}", response).is_err() {
        // Every reply fits; fall back to the failure line regardless
        out.clear();
        let _ = write!(out, "{}", Response::Error);
    }

    tx.write_all(out.as_bytes())
        .await
        .map_err(|e| SessionError::Write(e.kind()))?;
    tx.flush().await.map_err(|e| SessionError::Write(e.kind()))
}
