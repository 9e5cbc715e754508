//! Character frame for the two-row display.

use core::fmt;

use crate::app::dispatch::ActuatorState;
use crate::clock::CalendarTime;
use crate::state::SensorReadings;

pub const COLS: usize = 16;
pub const ROWS: usize = 2;

/// Scratch buffer for one formatted field. Longer than a row so that
/// clipping happens in [`Frame::put`].
pub type Field = heapless::String<32>;

/// A full display image. Cells hold printable ASCII only.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    cells: [[u8; COLS]; ROWS],
}

impl Frame {
    pub const fn blank() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
        }
    }

    /// Write `text` starting at (`col`, `row`), overwriting what is there.
    /// Anything past the right edge or below the last row is dropped;
    /// non-printable characters become `?`.
    pub fn put(&mut self, col: usize, row: usize, text: &str) {
        let Some(line) = self.cells.get_mut(row) else {
            return;
        };
        for (cell, ch) in line.iter_mut().skip(col).zip(text.chars()) {
            *cell = if ch.is_ascii_graphic() || ch == ' ' { ch as u8 } else { b'?' };
        }
    }

    /// Format into a field and [`put`](Self::put) it.
    pub fn put_fmt(&mut self, col: usize, row: usize, args: fmt::Arguments<'_>) {
        let mut field = Field::new();
        // Overflow keeps whatever fitted; the row is narrower anyway.
        let _ = fmt::write(&mut field, args);
        self.put(col, row, &field);
    }

    pub fn row_str(&self, row: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|line| core::str::from_utf8(line).ok())
            .unwrap_or("")
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entry(&self.row_str(0))
            .entry(&self.row_str(1))
            .finish()
    }
}

/// Everything a page reads from the shared pool, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderView {
    pub sensors: SensorReadings,
    pub calendar: CalendarTime,
    pub actuators: ActuatorState,
    pub detected: bool,
}
