//! Error type shared by the library and the `ttyplot` binary.

use std::io;
use std::path::Path;

/// Everything that can stop the dashboard.
///
/// Malformed input is deliberately absent: bad tokens are dropped by the
/// decoder and never become errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `origin` names the file (or `arguments`) the bad value came from.
    #[error("invalid configuration ({origin}): {reason}")]
    Config { origin: String, reason: String },

    /// The viewport asks for more history columns than the ring can hold.
    #[error("plot width {requested} exceeds buffer capacity {limit}")]
    CapacityExceeded { requested: usize, limit: usize },

    #[error("failed to set up signal notification channel: {0}")]
    Notifier(#[source] io::Error),

    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),
}

impl Error {
    pub(crate) fn config<S: Into<String>>(path: Option<&Path>, reason: S) -> Self {
        Error::Config {
            origin: path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "arguments".to_string()),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error. Every error is fatal, so never 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::CapacityExceeded { .. } => 2,
            Error::Notifier(_) => 3,
            Error::Config { .. } => 4,
            Error::Io(_) | Error::Terminal(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
