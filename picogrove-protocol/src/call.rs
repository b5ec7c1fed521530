//! Call-shaped line parsing: `name(arg, arg, ...)`.

use core::num::{IntErrorKind, ParseIntError};

use crate::error::{FramingError, ValidationError};

/// A line split into command name and raw argument string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Call<'a> {
    /// Text before the first `(`, trimmed
    pub name: &'a str,
    /// Text between the first `(` and the last `)`, trimmed
    pub args: &'a str,
}

/// Split a line into name and arguments
///
/// The line is trimmed first. The name ends at the first `(` and the
/// arguments end at the last `)`; anything after that is ignored.
/// Fails when the line is blank, has no `(`, starts with `(`, or has no
/// `)` after the `(`.
pub fn parse_call(line: &str) -> Result<Call<'_>, FramingError> {
    let s = line.trim();

    let open = match s.find('(') {
        Some(0) | None => return Err(FramingError::NotACall),
        Some(idx) => idx,
    };
    let close = match s.rfind(')') {
        Some(idx) if idx > open => idx,
        _ => return Err(FramingError::NotACall),
    };

    Ok(Call {
        name: s[..open].trim(),
        args: s[open + 1..close].trim(),
    })
}

/// How an argument string is split on commas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SplitMode {
    /// Split on every comma
    All,
    /// Split on the first comma only; the remainder stays one piece
    FirstComma,
}

/// Iterator over the trimmed, non-empty pieces of an argument string
#[derive(Debug, Clone)]
pub struct Args<'a> {
    rest: Option<&'a str>,
    splits_left: Option<usize>,
}

/// Split an argument string into trimmed pieces, dropping empty ones
pub fn split_args(args: &str, mode: SplitMode) -> Args<'_> {
    Args {
        rest: Some(args),
        splits_left: match mode {
            SplitMode::All => None,
            SplitMode::FirstComma => Some(1),
        },
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest?;
            let piece = if self.splits_left == Some(0) {
                self.rest = None;
                rest
            } else {
                match rest.split_once(',') {
                    Some((head, tail)) => {
                        self.rest = Some(tail);
                        if let Some(left) = self.splits_left.as_mut() {
                            *left -= 1;
                        }
                        head
                    }
                    None => {
                        self.rest = None;
                        rest
                    }
                }
            };

            let piece = piece.trim();
            if !piece.is_empty() {
                return Some(piece);
            }
        }
    }
}

/// Collect exactly `N` argument pieces
pub fn expect_args<const N: usize>(
    args: &str,
    mode: SplitMode,
) -> Result<[&str; N], ValidationError> {
    let mut out = [""; N];
    let mut found = 0usize;

    for piece in split_args(args, mode) {
        if found < N {
            out[found] = piece;
        }
        found += 1;
    }

    if found != N {
        return Err(ValidationError::ArityMismatch {
            expected: N as u8,
            found: found.min(u8::MAX as usize) as u8,
        });
    }
    Ok(out)
}

/// Parse an integer argument
///
/// Well-formed integers beyond the `i64` range saturate; callers clamp
/// to their own range afterwards.
pub fn parse_int(token: &str) -> Result<i64, ValidationError> {
    let digits = token.strip_prefix(|c| c == '+' || c == '-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotAnInteger);
    }
    token.parse().or_else(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(ValidationError::NotAnInteger),
    })
}
