//! crossterm implementation of [`Renderer`] and terminal mode handling.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::os::fd::AsRawFd;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::render::{AxisSpec, CellStyle, Renderer, Viewport};

const HLINE: char = '─';
const VLINE: char = '│';
const CORNER: char = '└';
const RIGHT_ARROW: char = '>';
const UP_ARROW: char = '^';

/// Raw mode plus alternate screen for as long as the guard lives.
///
/// Dropping the guard puts the terminal back the way it was, including on
/// early returns from the event loop.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Switch the terminal into dashboard mode.
    ///
    /// `tty` is the controlling terminal the keystrokes come from. Raw mode
    /// turns off signal generation; it is switched back on so that Ctrl-C
    /// still arrives as SIGINT.
    pub fn enter(tty: Option<&File>) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { active: true };
        if let Some(tty) = tty {
            enable_signal_keys(tty)?;
        }
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;

        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
        Ok(guard)
    }

    pub fn leave(mut self) -> io::Result<()> {
        self.active = false;
        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            restore_terminal();
        }
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn enable_signal_keys(tty: &File) -> io::Result<()> {
    let fd = tty.as_raw_fd();
    // SAFETY: `termios` is plain data and `fd` is an open descriptor.
    unsafe {
        let mut tio: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut tio) != 0 {
            return Err(io::Error::last_os_error());
        }
        tio.c_lflag |= libc::ISIG;
        if libc::tcsetattr(fd, libc::TCSANOW, &tio) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Paints frames with crossterm commands queued on a writer.
pub struct TerminalRenderer<W: Write> {
    out: W,
    size: Viewport,
}

impl TerminalRenderer<BufWriter<Stdout>> {
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            size: Viewport::default(),
        }
    }

    fn in_bounds(&self, row: u16, col: u16) -> bool {
        row < self.size.rows && col < self.size.cols
    }

    fn put(&mut self, row: u16, col: u16, glyph: char) -> io::Result<()> {
        if self.in_bounds(row, col) {
            queue!(self.out, MoveTo(col, row), Print(glyph))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> io::Result<()> {
        if style.contains(CellStyle::REVERSE) {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        if style.contains(CellStyle::ALERT) {
            queue!(self.out, SetForegroundColor(Color::Red))?;
        }
        Ok(())
    }

    fn reset_style(&mut self) -> io::Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn viewport(&mut self) -> io::Result<Viewport> {
        let (cols, rows) = terminal::size()?;
        self.size = Viewport::new(rows, cols);
        Ok(self.size)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn draw_axis(&mut self, axis: &AxisSpec) -> io::Result<()> {
        let (row, col) = (axis.origin_row, axis.origin_col);
        for c in 1..axis.width {
            self.put(row, col + c, HLINE)?;
        }
        for r in 1..axis.height {
            if let Some(y) = row.checked_sub(r) {
                self.put(y, col, VLINE)?;
            }
        }
        self.put(row, col + axis.width, RIGHT_ARROW)?;
        if let Some(y) = row.checked_sub(axis.height) {
            self.put(y, col, UP_ARROW)?;
        }
        self.put(row, col, CORNER)
    }

    fn draw_vertical_run(
        &mut self,
        row: u16,
        col: u16,
        height: u16,
        glyph: char,
        style: CellStyle,
    ) -> io::Result<()> {
        self.set_style(style)?;
        for y in row..row.saturating_add(height) {
            self.put(y, col, glyph)?;
        }
        self.reset_style()
    }

    fn draw_text(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        if !self.in_bounds(row, col) {
            return Ok(());
        }
        let room = (self.size.cols - col) as usize;
        let clipped: String = text.chars().take(room).collect();
        queue!(self.out, MoveTo(col, row), Print(clipped))
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0))?;
        self.out.flush()
    }
}
