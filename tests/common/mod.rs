#![allow(dead_code)]

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use ttyplot::{AxisSpec, CellStyle, Renderer, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear,
    Axis(AxisSpec),
    Run {
        row: u16,
        col: u16,
        height: u16,
        glyph: char,
        style: CellStyle,
    },
    Text {
        row: u16,
        col: u16,
        text: String,
    },
    Flush,
}

/// Renderer that remembers every request instead of painting.
///
/// The viewport is shared so a test can "resize the terminal" while the
/// renderer is owned by an `App`.
pub struct RecordingRenderer {
    pub size: Rc<Cell<Viewport>>,
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            size: Rc::new(Cell::new(Viewport::new(rows, cols))),
            calls: Vec::new(),
        }
    }

    pub fn texts(&self) -> Vec<(u16, u16, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text { row, col, text } => Some((*row, *col, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|(_, _, t)| t.contains(needle))
    }

    pub fn text_at(&self, row: u16, col: u16) -> Option<&str> {
        self.texts()
            .into_iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, t)| t)
    }

    pub fn axes(&self) -> Vec<AxisSpec> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Axis(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    /// Vertical runs inside the plot area, as (row, col, height, glyph, style).
    pub fn plot_runs(&self) -> Vec<(u16, u16, u16, char, CellStyle)> {
        let plot_bottom = self.size.get().rows.saturating_sub(3);
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Run {
                    row,
                    col,
                    height,
                    glyph,
                    style,
                } if *col >= 3 && *row < plot_bottom => Some((*row, *col, *height, *glyph, *style)),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Flush).count()
    }
}

impl Renderer for RecordingRenderer {
    fn viewport(&mut self) -> io::Result<Viewport> {
        Ok(self.size.get())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_axis(&mut self, axis: &AxisSpec) -> io::Result<()> {
        self.calls.push(Call::Axis(*axis));
        Ok(())
    }

    fn draw_vertical_run(
        &mut self,
        row: u16,
        col: u16,
        height: u16,
        glyph: char,
        style: CellStyle,
    ) -> io::Result<()> {
        self.calls.push(Call::Run {
            row,
            col,
            height,
            glyph,
            style,
        });
        Ok(())
    }

    fn draw_text(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        self.calls.push(Call::Text {
            row,
            col,
            text: text.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls.push(Call::Flush);
        Ok(())
    }
}
