//! The dashboard context and its event loop.
//!
//! | Sub-module  | Responsibility |
//! | ----------- | -------------- |
//! | [`update`]  | Reactions to data, keystrokes, notifications and the clock |
//! | [`run`]     | Terminal setup and the `poll(2)` loop driving an [`App`] |
//!
//! All state the loop mutates lives in one [`App`], owned by the loop and
//! touched only from the main thread.

mod run;
mod update;

pub use run::{event_loop, run};
pub use update::INPUT_CLOSED;

use crate::config::PlotConfig;
use crate::data::{RateTransform, Record, SampleStore, StreamDecoder};
use crate::error::{Error, Result};
use crate::plot::plot_capacity;
use crate::render::{Renderer, Viewport};

/// Where the loop currently is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Blocked in the readiness wait.
    WaitingForEvents,
    /// Servicing the descriptors the wait reported.
    Draining,
    Rendering,
    /// Quit or interrupt seen; the loop exits at the next check.
    Terminating,
}

/// Everything the event loop owns between two readiness waits.
pub struct App<R: Renderer> {
    config: PlotConfig,
    renderer: R,
    viewport: Viewport,
    store: SampleStore,
    decoder: StreamDecoder,
    rates: RateTransform,
    /// Scratch space for decoded records, reused across reads.
    records: Vec<Record>,
    /// Persistent message such as "input closed".
    status: Option<String>,
    state: LoopState,
    redraw: bool,
    input_open: bool,
    /// Unix second shown by the last drawn clock.
    clock_second: Option<i64>,
}

impl<R: Renderer> App<R> {
    /// Size the history after the renderer's viewport.
    ///
    /// Fails with [`Error::CapacityExceeded`] if the terminal is wider than
    /// the history can hold.
    pub fn new(config: PlotConfig, mut renderer: R) -> Result<Self> {
        let viewport = renderer.viewport().map_err(Error::Terminal)?;
        let store = SampleStore::new(plot_capacity(viewport), config.two_series)?;
        log::debug!(
            "viewport {}x{}, history of {} columns",
            viewport.cols,
            viewport.rows,
            store.capacity()
        );
        Ok(Self {
            decoder: StreamDecoder::new(config.record_mode()),
            rates: RateTransform::new(config.rate),
            config,
            renderer,
            viewport,
            store,
            records: Vec::new(),
            status: None,
            state: LoopState::WaitingForEvents,
            redraw: true,
            input_open: true,
            clock_second: None,
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_rate_mode(&self) -> bool {
        self.rates.is_enabled()
    }

    /// `false` once the data source hit end-of-stream or a fatal error.
    pub fn input_open(&self) -> bool {
        self.input_open
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn is_terminating(&self) -> bool {
        self.state == LoopState::Terminating
    }

    /// Largest read the decoder can take without overflowing its window.
    pub fn read_size(&self) -> usize {
        self.decoder.spare_capacity().max(1)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
