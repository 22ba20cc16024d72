//! ttyplot crate root: re-exports and module wiring.
//!
//! A realtime terminal dashboard for numbers read from a byte stream:
//! - `data`: stream decoder, sample ring, rate transform and axis scaling
//! - `plot`: frame layout, drawn through the [`Renderer`] trait
//! - `term`: crossterm-backed renderer and terminal mode guard
//! - `events`: self-pipe delivery of signals to the event loop
//! - `app`: the context object and `poll(2)` loop tying it together
//! - `config` / `hotkeys`: YAML-backed settings

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod hotkeys;
pub mod plot;
pub mod render;
pub mod term;

// Public re-exports for a compact external API
pub use app::{event_loop, run, App, LoopState};
pub use config::PlotConfig;
pub use data::{
    AxisLimits, RateTransform, Record, RecordMode, SampleStore, Series, Statistics, StreamDecoder,
};
pub use error::{Error, Result};
pub use events::{Notification, Notifier};
pub use hotkeys::{Action, Hotkeys};
pub use plot::VERSION_STRING;
pub use render::{AxisSpec, CellStyle, Renderer, Viewport};
