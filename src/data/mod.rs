//! Data engine: decoding, storage, rate transform and scaling.
//!
//! Nothing in here touches the terminal or the OS; the event loop feeds bytes
//! in and the plot reads the results out.

pub mod decoder;
pub mod rate;
pub mod ring;
pub mod scale;

pub use decoder::{Record, RecordMode, StreamDecoder};
pub use rate::RateTransform;
pub use ring::{SampleRing, SampleStore, Series, Statistics, MAX_CAPACITY};
pub use scale::{AxisLimits, AxisWindow, Classification, Extent};
