//! Errors raised by the data pipeline (parsing, derivation, chart configuration).
//!
//! The binary wraps these in `anyhow` at the edge; everything below `main`
//! returns `Result<T, PlotError>` so callers and tests can match on the kind.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("format error in {}:{line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: field {field} is required but missing from the header", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("unrecognized field name \"{0}\"")]
    UnrecognizedField(String),

    #[error("configuration error in graph #{graph}: {message}")]
    Config { graph: usize, message: String },

    #[error(
        "configuration error in graph #{graph}: all lines must have the same length \
         (expected {expected}, \"{label}\" has {found})"
    )]
    LineLengthMismatch {
        graph: usize,
        expected: usize,
        found: usize,
        label: String,
    },
}

impl PlotError {
    pub(crate) fn format(
        path: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        PlotError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn config(graph: usize, message: impl Into<String>) -> Self {
        PlotError::Config {
            graph,
            message: message.into(),
        }
    }
}
