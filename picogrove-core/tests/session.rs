mod common;

use std::collections::VecDeque;
use std::convert::Infallible;

use common::{context, MockLed};
use embassy_futures::block_on;
use embedded_io::ErrorKind;
use picogrove_core::{Session, SessionError};
use picogrove_hal::OutputPin;
use picogrove_protocol::Response;

/// Host stream delivering scripted chunks, then end of file
struct ScriptedRx {
    chunks: VecDeque<Result<Vec<u8>, ErrorKind>>,
}

impl ScriptedRx {
    fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| Ok(c.to_vec())).collect(),
        }
    }
}

impl embedded_io::ErrorType for ScriptedRx {
    type Error = ErrorKind;
}

impl embedded_io_async::Read for ScriptedRx {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.chunks.pop_front() {
            None => Ok(0),
            Some(Err(kind)) => Err(kind),
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.chunks.push_front(Ok(chunk.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

#[derive(Default)]
struct CaptureTx {
    bytes: Vec<u8>,
    flushes: usize,
}

impl CaptureTx {
    fn text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap()
    }
}

impl embedded_io::ErrorType for CaptureTx {
    type Error = Infallible;
}

impl embedded_io_async::Write for CaptureTx {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn test_one_reply_per_line() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let mut rx = ScriptedRx::new(&[b"digitalWrite(16, HIGH)\r\n", b"digitalRead(16)\n"]);
    let mut tx = CaptureTx::default();

    let first = block_on(session.serve_next(&mut ctx, &mut rx, &mut tx));
    assert_eq!(first, Ok(Response::Ack));
    assert_eq!(tx.text(), "\n");

    let second = block_on(session.serve_next(&mut ctx, &mut rx, &mut tx));
    assert_eq!(second, Ok(Response::Level(1)));
    assert_eq!(tx.text(), "\n1\n");
    assert_eq!(tx.flushes, 2);
}

#[test]
fn test_lines_split_across_reads() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let mut rx = ScriptedRx::new(&[b"analog", b"Read(", b"1)", b"\n"]);
    let mut tx = CaptureTx::default();

    let reply = block_on(session.serve_next(&mut ctx, &mut rx, &mut tx));
    assert_eq!(reply, Ok(Response::Sample(31245)));
    assert_eq!(tx.text(), "31245\n");
}

#[test]
fn test_pipelined_lines_answered_in_order() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let mut rx = ScriptedRx::new(&[b"analogRead(0)\nfoo\nanalogRead(2)\n"]);
    let mut tx = CaptureTx::default();

    for _ in 0..3 {
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)).unwrap();
    }
    assert_eq!(tx.text(), "0\nerror\n65535\n");
    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Err(SessionError::Closed)
    );
}

#[test]
fn test_framing_errors_reply_error() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let long = [b'x'; 300];
    let mut rx = ScriptedRx::new(&[&long, b"\n", b"\xff\xfe\n", b"analogRead(1)\n"]);
    let mut tx = CaptureTx::default();

    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Ok(Response::Error)
    );
    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Ok(Response::Error)
    );
    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Ok(Response::Sample(31245))
    );
    assert_eq!(tx.text(), "error\nerror\n31245\n");
}

#[test]
fn test_activity_indicator_pulses_per_command() {
    let (mut ctx, _) = context();
    let led = MockLed::default();
    let transitions = led.transitions.clone();
    let mut session = Session::new(led);
    let mut rx = ScriptedRx::new(&[b"analogRead(0)\n", b"bogus\n"]);
    let mut tx = CaptureTx::default();

    block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)).unwrap();
    block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)).unwrap();

    // Off at start, then on/off around each command, failures included
    assert_eq!(
        transitions.borrow().as_slice(),
        &[false, true, false, true, false]
    );
    assert!(!session.indicator().is_set_high());
}

#[test]
fn test_activity_indicator_pulses_for_rejected_lines() {
    let (mut ctx, _) = context();
    let led = MockLed::default();
    let transitions = led.transitions.clone();
    let mut session = Session::new(led);
    let mut rx = ScriptedRx::new(&[b"\xff\xfe\n", b"analogRead(0)\n"]);
    let mut tx = CaptureTx::default();

    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Ok(Response::Error)
    );
    assert_eq!(transitions.borrow().as_slice(), &[false, true, false]);

    block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)).unwrap();
    assert_eq!(
        transitions.borrow().as_slice(),
        &[false, true, false, true, false]
    );
}

#[test]
fn test_read_error_resynchronises() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let mut rx = ScriptedRx {
        chunks: [
            Ok(b"analogRe".to_vec()),
            Err(ErrorKind::Other),
            Ok(b"analogRead(2)\n".to_vec()),
        ]
        .into_iter()
        .collect(),
    };
    let mut tx = CaptureTx::default();

    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Err(SessionError::Read(ErrorKind::Other))
    );
    assert_eq!(
        block_on(session.serve_next(&mut ctx, &mut rx, &mut tx)),
        Ok(Response::Sample(65535))
    );
}

#[test]
fn test_run_until_closed() {
    let (mut ctx, _) = context();
    let mut session = Session::new(MockLed::default());
    let mut rx = ScriptedRx {
        chunks: [
            Ok(b"digitalWrite(18, HIGH)\n".to_vec()),
            Err(ErrorKind::Other),
            Ok(b"digitalRead(18)\n".to_vec()),
        ]
        .into_iter()
        .collect(),
    };
    let mut tx = CaptureTx::default();

    let end = block_on(session.run(&mut ctx, &mut rx, &mut tx));
    assert_eq!(end, SessionError::Closed);
    assert_eq!(tx.text(), "\n1\n");
}
