//! The boundary to whatever paints character cells.
//!
//! The dashboard never writes escape sequences itself. It asks a [`Renderer`]
//! for the viewport size and issues a handful of drawing requests per frame;
//! [`crate::term::TerminalRenderer`] implements them with crossterm and tests
//! use a recording implementation.

use std::fmt;
use std::io;
use std::ops::BitOr;

/// Size of the drawable area in character cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    pub rows: u16,
    pub cols: u16,
}

impl Viewport {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

/// Bitflags describing how a run of cells is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle(pub u8);

impl CellStyle {
    pub const NORMAL: Self = Self(0);
    /// Swap foreground and background.
    pub const REVERSE: Self = Self(1 << 0);
    /// The cell marks a sample outside the hard limits.
    pub const ALERT: Self = Self(1 << 1);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for CellStyle {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for CellStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NORMAL {
            return write!(f, "NORMAL");
        }
        let mut parts = Vec::new();
        if self.contains(Self::REVERSE) {
            parts.push("REVERSE");
        }
        if self.contains(Self::ALERT) {
            parts.push("ALERT");
        }
        write!(f, "{}", parts.join("|"))
    }
}

/// Geometry of the chart axes, in cell coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisSpec {
    /// Row and column of the corner where both axes meet.
    pub origin_row: u16,
    pub origin_col: u16,
    /// Cells of horizontal axis to the right of the corner.
    pub width: u16,
    /// Cells of vertical axis above the corner.
    pub height: u16,
}

/// Drawing primitives the dashboard needs from a terminal library.
///
/// Rows and columns are zero-based from the top-left corner. Implementations
/// clip anything that falls outside the viewport.
pub trait Renderer {
    fn viewport(&mut self) -> io::Result<Viewport>;

    /// Blank the whole frame.
    fn clear(&mut self) -> io::Result<()>;

    /// Draw both axes with their arrows and the corner piece.
    fn draw_axis(&mut self, axis: &AxisSpec) -> io::Result<()>;

    /// Draw `height` copies of `glyph` from `row` downwards in column `col`.
    fn draw_vertical_run(
        &mut self,
        row: u16,
        col: u16,
        height: u16,
        glyph: char,
        style: CellStyle,
    ) -> io::Result<()>;

    fn draw_text(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;

    /// Make everything drawn since the last flush visible.
    fn flush(&mut self) -> io::Result<()>;
}
