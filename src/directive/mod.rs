//! Chart directives: the ordered command-line stream that describes one or
//! more charts, and its folding into plot specifications.
//!
//! `lex` turns raw argv tokens into typed directives, one group per chart
//! (groups are separated by `-n/--next`). `interp` folds each group into a
//! `PlotSpec`, loading datasets through a per-invocation cache.

pub mod interp;
pub mod lex;

pub use interp::{DatasetCache, plot_specs_from_args};

use std::path::PathBuf;

/// File argument that reserves a row of color slots without loading data.
pub const ABSENT_FILE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    CycleLength(usize),
    /// Field name as typed; resolved by the interpreter.
    Field(String),
    /// Next field goes on the right axis.
    Right,
    /// Next field hides values of dropped frames.
    Drop,
    Offset(usize),
    Frames(usize),
    Title(String),
    Output(PathBuf),
    File(String),
}
