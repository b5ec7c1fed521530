//! Display adapter for `setText` and `setRGB`
//!
//! Each bus gets its display opened on first use. A bus whose driver is
//! missing is remembered as unavailable for the rest of the session; a
//! bus that failed for any other reason is retried on the next command.

use heapless::String;
use picogrove_protocol::BusId;

use crate::traits::{CharacterDisplay, DisplayError, DisplayProvider};

/// Columns per display row
pub const DISPLAY_COLS: usize = 16;

/// Rows on the display
pub const DISPLAY_ROWS: usize = 2;

/// Characters shown at most
pub const DISPLAY_CHARS: usize = DISPLAY_COLS * DISPLAY_ROWS;

/// One display row; sized for 16 characters of up to four UTF-8 bytes
pub type RowText = String<{ DISPLAY_COLS * 4 }>;

/// Text split into the two display rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLayout {
    /// First 16 characters
    pub first: RowText,
    /// Characters 17-32
    pub second: RowText,
}

/// Arrange free text for a 2x16 display
///
/// Surrounding whitespace is trimmed, carriage returns and line feeds
/// become spaces, and only the first 32 characters are kept. Rows are not
/// padded.
pub fn layout_text(text: &str) -> TextLayout {
    let mut layout = TextLayout::default();

    let chars = text
        .trim()
        .chars()
        .map(|ch| if ch == '\r' || ch == '\n' { ' ' } else { ch })
        .take(DISPLAY_CHARS);

    for (idx, ch) in chars.enumerate() {
        let row = if idx < DISPLAY_COLS {
            &mut layout.first
        } else {
            &mut layout.second
        };
        // Cannot overflow: each row holds 16 chars of at most 4 bytes
        let _ = row.push(ch);
    }

    layout
}

enum Slot<D> {
    Uninitialized,
    Ready(D),
    Unavailable,
}

/// Per-bus display cache
pub struct DisplayAdapter<P: DisplayProvider> {
    provider: P,
    slots: [Slot<P::Display>; 2],
}

impl<P: DisplayProvider> DisplayAdapter<P> {
    /// Create an adapter; when `enabled` is false every bus is unavailable
    pub fn new(provider: P, enabled: bool) -> Self {
        let initial = || {
            if enabled {
                Slot::Uninitialized
            } else {
                Slot::Unavailable
            }
        };
        Self {
            provider,
            slots: [initial(), initial()],
        }
    }

    /// Whether the display on `bus` has been opened
    pub fn is_ready(&self, bus: BusId) -> bool {
        matches!(self.slots[bus.index()], Slot::Ready(_))
    }

    /// Whether `bus` has been marked permanently unavailable
    pub fn is_unavailable(&self, bus: BusId) -> bool {
        matches!(self.slots[bus.index()], Slot::Unavailable)
    }

    fn display(&mut self, bus: BusId) -> Result<&mut P::Display, DisplayError> {
        let slot = &mut self.slots[bus.index()];

        if let Slot::Uninitialized = slot {
            match self.provider.open(bus) {
                Ok(display) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Display ready on {}", bus);
                    *slot = Slot::Ready(display);
                }
                Err(DisplayError::Unavailable) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("No display driver for {}", bus);
                    *slot = Slot::Unavailable;
                }
                Err(e) => return Err(e),
            }
        }

        match slot {
            Slot::Ready(display) => Ok(display),
            _ => Err(DisplayError::Unavailable),
        }
    }

    /// Show text on the display attached to `bus`
    ///
    /// Clearing is best effort; a failed clear does not stop the write.
    pub fn set_text(&mut self, bus: BusId, text: &str) -> Result<(), DisplayError> {
        let layout = layout_text(text);
        let display = self.display(bus)?;

        let _ = display.clear();
        display.home()?;
        display.write_str(&layout.first)?;
        if !layout.second.is_empty() {
            display.set_cursor(0, 1)?;
            display.write_str(&layout.second)?;
        }
        Ok(())
    }

    /// Set the backlight colour on `bus`
    ///
    /// Succeeds without effect when the display has no colour backlight.
    pub fn set_rgb(
        &mut self,
        bus: BusId,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<(), DisplayError> {
        let display = self.display(bus)?;
        let Some(backlight) = display.backlight() else {
            return Ok(());
        };

        let component =
            |value: i64| u8::try_from(value).map_err(|_| DisplayError::InvalidColor);
        backlight.set_rgb(component(red)?, component(green)?, component(blue)?)
    }
}
