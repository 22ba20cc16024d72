//! State transitions of [`App`].
//!
//! Every handler only marks the frame dirty; drawing happens once per loop
//! iteration in [`App::render_if_needed`].

use std::io;
use std::time::Instant;

use crate::data::ring::clamp_non_negative;
use crate::data::Record;
use crate::error::{Error, Result};
use crate::events::Notification;
use crate::hotkeys::Action;
use crate::plot::{self, FrameInfo};
use crate::render::Renderer;

use super::{App, LoopState};

/// Status shown once the data source reaches end-of-stream.
pub const INPUT_CLOSED: &str = "input stream closed";

/// asctime(3)-style clock.
const CLOCK_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

impl<R: Renderer> App<R> {
    /// Feed a chunk read from the data source.
    pub fn handle_data(&mut self, chunk: &[u8], now: Instant) {
        let mut records = std::mem::take(&mut self.records);
        records.clear();
        self.decoder.feed(chunk, &mut records);
        self.accept(&records, now);
        self.records = records;
    }

    /// The data source reached end-of-stream. Not fatal.
    pub fn handle_eof(&mut self, now: Instant) {
        let mut records = std::mem::take(&mut self.records);
        records.clear();
        self.decoder.finish(&mut records);
        self.accept(&records, now);
        self.records = records;
        log::info!("input stream closed after {} records", self.store.total_written());
        self.close_input(INPUT_CLOSED.to_string());
    }

    /// Any read error other than a transient one. Shown, then ignored.
    pub fn handle_read_error(&mut self, err: &io::Error) {
        log::error!("reading input failed: {}", err);
        self.close_input(format!("read error: {}", err));
    }

    fn close_input(&mut self, status: String) {
        self.input_open = false;
        self.status = Some(status);
        self.redraw = true;
    }

    fn accept(&mut self, records: &[Record], now: Instant) {
        for rec in records {
            // Counters are clamped before they are derived.
            let (v1, v2) = self.rates.apply(
                clamp_non_negative(rec.v1),
                rec.v2.map(clamp_non_negative),
                now,
            );
            self.store.record(v1, v2);
        }
        if !records.is_empty() {
            log::trace!("accepted {} records", records.len());
            self.redraw = true;
        }
    }

    /// One byte from the keyboard. Unbound keys do nothing.
    pub fn handle_key(&mut self, byte: u8) {
        let Some(action) = self.config.hotkeys.action_for(byte) else {
            return;
        };
        log::debug!("key {:?}: {}", byte as char, action);
        match action {
            Action::ToggleRate => {
                self.rates.toggle();
                self.redraw = true;
            }
            Action::Quit => self.state = LoopState::Terminating,
        }
    }

    pub fn handle_notification(&mut self, n: Notification) -> Result<()> {
        match n {
            Notification::Interrupt => {
                log::info!("interrupt received");
                self.state = LoopState::Terminating;
                Ok(())
            }
            Notification::Resize => self.resize(),
        }
    }

    /// Re-read the viewport and re-window the history to the new width.
    pub fn resize(&mut self) -> Result<()> {
        let viewport = self.renderer.viewport().map_err(Error::Terminal)?;
        self.store.resize(plot::plot_capacity(viewport))?;
        if viewport != self.viewport {
            log::debug!("resized to {}x{}", viewport.cols, viewport.rows);
        }
        self.viewport = viewport;
        self.redraw = true;
        Ok(())
    }

    /// Mark the frame dirty when the wall clock enters a new second.
    pub fn tick(&mut self, unix_second: i64) {
        if self.clock_second != Some(unix_second) {
            self.clock_second = Some(unix_second);
            self.redraw = true;
        }
    }

    /// Draw a frame if something changed since the last one.
    ///
    /// Returns whether a frame was drawn.
    pub fn render_if_needed(&mut self) -> Result<bool> {
        if !self.redraw {
            return Ok(false);
        }
        let previous = self.state;
        self.state = LoopState::Rendering;
        let clock = chrono::Local::now().format(CLOCK_FORMAT).to_string();
        let frame = FrameInfo {
            config: &self.config,
            store: &self.store,
            rate_mode: self.rates.is_enabled(),
            interval: self.rates.last_interval(),
            status: self.status.as_deref(),
            clock: &clock,
        };
        let drawn = plot::draw_frame(&mut self.renderer, self.viewport, &frame);
        self.state = previous;
        drawn.map_err(Error::Terminal)?;
        self.redraw = false;
        Ok(true)
    }
}
