//! One parsed loopback log: per-field sample columns plus derived metrics.

pub mod derive;
pub mod parse;

pub use parse::parse_dataset_file;

use crate::error::{PlotError, Result};
use crate::field::{FieldId, FieldSelector};
use crate::plot::PlotLine;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Field id -> one sample per frame.
pub type Samples = BTreeMap<FieldId, Vec<f64>>;

#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    title: String,
    length: usize,
    samples: Samples,
}

impl Dataset {
    /// Build a dataset from raw columns: normalize the time origin, then add
    /// the derived metrics. Every column must hold `length` samples.
    pub(crate) fn new(
        path: &Path,
        title: String,
        length: usize,
        mut samples: Samples,
    ) -> Result<Self> {
        if let Some((field, column)) = samples.iter().find(|(_, v)| v.len() != length) {
            // Line 2 holds the frame count the columns disagree with.
            return Err(PlotError::format(
                path,
                2,
                format!(
                    "{} has {} samples, expected {}",
                    field.name(),
                    column.len(),
                    length
                ),
            ));
        }

        derive::subtract_first_input_time(path, &mut samples)?;
        derive::generate_derived(path, length, &mut samples)?;

        debug!(
            "loaded {}: {:?}, {} frames, fields [{}]",
            path.display(),
            title,
            length,
            samples
                .keys()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            path: path.to_path_buf(),
            title,
            length,
            samples,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn samples(&self, field: FieldId) -> Option<&[f64]> {
        self.samples.get(&field).map(Vec::as_slice)
    }

    fn is_dropped(&self, frame: usize) -> bool {
        self.samples(FieldId::Dropped)
            .and_then(|d| d.get(frame))
            .is_some_and(|&flag| flag != 0.0)
    }

    /// Replace values of dropped frames with `None` so they are not drawn.
    pub fn hide_dropped(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values
            .iter()
            .enumerate()
            .map(|(k, v)| if self.is_dropped(k) { None } else { *v })
            .collect()
    }

    /// Append one line per selector to `out`. Skip selectors append `None`,
    /// which keeps a color slot but draws nothing.
    pub fn emit_lines(&self, fields: &[FieldSelector], out: &mut Vec<Option<PlotLine>>) {
        for selector in fields {
            let Some(field) = selector.field else {
                out.push(None);
                continue;
            };

            let mut values: Vec<Option<f64>> = match self.samples(field) {
                Some(samples) => samples.iter().copied().map(Some).collect(),
                None => {
                    warn!(
                        "{} has no {} column; plotting it as empty",
                        self.path.display(),
                        field.name()
                    );
                    vec![None; self.length]
                }
            };

            if selector.flags.hide_dropped {
                values = self.hide_dropped(&values);
            }

            out.push(Some(PlotLine {
                label: format!("{} {}", self.title, field.title()),
                values,
                flags: selector.flags,
            }));
        }
    }
}
