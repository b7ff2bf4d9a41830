//! Plot specification: which fields of which datasets go into one chart, and
//! how they are sliced and averaged before drawing.

pub mod chart;

pub use chart::ChartData;

use crate::cycle::average_over_cycle;
use crate::dataset::Dataset;
use crate::error::{PlotError, Result};
use crate::field::{FieldSelector, LineFlags};
use log::info;
use std::path::PathBuf;
use std::rc::Rc;

pub const DEFAULT_TITLE: &str = "Graph";

/// One series ready to plot. `None` values are gaps, not zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub flags: LineFlags,
}

#[derive(Debug, Clone)]
pub struct PlotSpec {
    /// Index of the chart group this spec was built from.
    pub graph: usize,
    pub fields: Vec<FieldSelector>,
    /// `None` reserves a full row of color slots without data.
    pub datasets: Vec<Option<Rc<Dataset>>>,
    pub cycle_length: Option<usize>,
    pub frames: Option<usize>,
    pub offset: usize,
    pub output: Option<PathBuf>,
    pub title: String,
}

impl PlotSpec {
    pub fn new(
        graph: usize,
        fields: Vec<FieldSelector>,
        datasets: Vec<Option<Rc<Dataset>>>,
    ) -> Self {
        Self {
            graph,
            fields,
            datasets,
            cycle_length: None,
            frames: None,
            offset: 0,
            output: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    fn slice_values(&self, values: Vec<Option<f64>>) -> Vec<Option<f64>> {
        values
            .into_iter()
            .skip(self.offset)
            .take(self.frames.unwrap_or(usize::MAX))
            .collect()
    }

    /// Emit every line of the chart (`None` for skipped color slots), sliced,
    /// optionally cycle-averaged and checked for a common length.
    pub fn lines(&self) -> Result<Vec<Option<PlotLine>>> {
        let mut lines: Vec<Option<PlotLine>> = Vec::new();
        for data in &self.datasets {
            match data {
                Some(data) => data.emit_lines(&self.fields, &mut lines),
                None => lines.extend(std::iter::repeat_n(None, self.fields.len())),
            }
        }

        let mut length: Option<usize> = None;
        for line in lines.iter_mut().flatten() {
            let mut values = self.slice_values(std::mem::take(&mut line.values));
            if let Some(cycle) = self.cycle_length {
                values = average_over_cycle(&values, cycle);
            }
            line.values = values;

            match length {
                None => length = Some(line.values.len()),
                Some(expected) if expected != line.values.len() => {
                    return Err(PlotError::LineLengthMismatch {
                        graph: self.graph,
                        expected,
                        found: line.values.len(),
                        label: line.label.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(lines)
    }

    /// Build the renderer's view of this chart: x coordinates, colors, axes.
    pub fn materialize(&self) -> Result<ChartData> {
        let lines = self.lines()?;
        let x_start = if self.cycle_length.is_some() { 0 } else { self.offset };
        let chart = ChartData::from_lines(&self.title, lines, x_start);
        info!(
            "graph #{} {:?}: {} lines{}",
            self.graph,
            chart.title,
            chart.lines.len(),
            if chart.has_right_axis { ", right axis" } else { "" }
        );
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse::parse_dataset;
    use crate::field::FieldId;
    use crate::plot::chart::COLOR_CYCLE;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const HEADER: &str = "dropped input_time_ms send_time_ms recv_time_ms render_time_ms psnr";

    fn dataset(title: &str, psnr: &[f64]) -> Rc<Dataset> {
        let mut text = format!("{}\n{}\n{}\n", title, psnr.len(), HEADER);
        for (k, p) in psnr.iter().enumerate() {
            let dropped = if k == 1 { 1 } else { 0 };
            let t = k * 10;
            text.push_str(&format!(
                "{} {} {} {} {} {}\n",
                dropped,
                t,
                t + 1,
                t + 2,
                t + 3,
                p
            ));
        }
        Rc::new(parse_dataset(Path::new(title), &text).unwrap())
    }

    fn field(id: FieldId) -> FieldSelector {
        FieldSelector::new(id, LineFlags::default())
    }

    fn values(line: &Option<PlotLine>) -> Vec<Option<f64>> {
        line.as_ref().unwrap().values.clone()
    }

    #[test]
    fn offset_then_frames() {
        let data = dataset("a", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut spec = PlotSpec::new(0, vec![field(FieldId::Psnr)], vec![Some(data)]);
        spec.offset = 1;
        spec.frames = Some(3);
        let lines = spec.lines().unwrap();
        assert_eq!(values(&lines[0]), vec![Some(2.0), Some(3.0), Some(4.0)]);

        let chart = spec.materialize().unwrap();
        assert_eq!(chart.lines[0].x, vec![1, 2, 3]);
    }

    #[test]
    fn cycle_average_after_slicing() {
        let data = dataset("a", &[9.0, 1.0, 3.0, 2.0, 5.0]);
        let mut spec = PlotSpec::new(0, vec![field(FieldId::Psnr)], vec![Some(data)]);
        spec.offset = 1;
        spec.cycle_length = Some(2);
        let lines = spec.lines().unwrap();
        assert_eq!(values(&lines[0]), vec![Some(1.5), Some(4.0)]);

        let chart = spec.materialize().unwrap();
        assert_eq!(chart.lines[0].x, vec![0, 1]);
    }

    #[test]
    fn hidden_drops_are_skipped_when_averaging() {
        let data = dataset("a", &[1.0, 100.0, 3.0, 5.0]);
        let hide = FieldSelector::new(
            FieldId::Psnr,
            LineFlags {
                hide_dropped: true,
                right_axis: false,
            },
        );
        let mut spec = PlotSpec::new(0, vec![hide], vec![Some(data)]);
        spec.cycle_length = Some(2);
        let lines = spec.lines().unwrap();
        assert_eq!(values(&lines[0]), vec![Some(2.0), Some(5.0)]);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let a = dataset("a", &[1.0, 2.0, 3.0]);
        let b = dataset("b", &[1.0, 2.0]);
        let spec = PlotSpec::new(4, vec![field(FieldId::Psnr)], vec![Some(a), Some(b)]);
        let err = spec.lines().unwrap_err();
        match err {
            PlotError::LineLengthMismatch {
                graph,
                expected,
                found,
                label,
            } => {
                assert_eq!((graph, expected, found), (4, 3, 2));
                assert_eq!(label, "b PSNR");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn frame_cap_aligns_different_lengths() {
        let a = dataset("a", &[1.0, 2.0, 3.0]);
        let b = dataset("b", &[1.0, 2.0]);
        let mut spec = PlotSpec::new(0, vec![field(FieldId::Psnr)], vec![Some(a), Some(b)]);
        spec.frames = Some(2);
        assert_eq!(spec.lines().unwrap().len(), 2);
    }

    #[test]
    fn absent_dataset_reserves_color_slots() {
        let a = dataset("a", &[1.0, 2.0]);
        let spec = PlotSpec::new(
            0,
            vec![field(FieldId::Psnr), FieldSelector::skip(), field(FieldId::EndToEnd)],
            vec![None, Some(a)],
        );
        let lines = spec.lines().unwrap();
        assert_eq!(lines.len(), 6);
        assert!(lines[..3].iter().all(Option::is_none));
        assert!(lines[3].is_some());
        assert!(lines[4].is_none());
        assert!(lines[5].is_some());

        let chart = spec.materialize().unwrap();
        let colors: Vec<&str> = chart.lines.iter().map(|l| l.color).collect();
        assert_eq!(colors, vec![COLOR_CYCLE[3], COLOR_CYCLE[5]]);
    }

    #[test]
    fn default_title() {
        let spec = PlotSpec::new(0, vec![], vec![]);
        assert_eq!(spec.title, "Graph");
        assert_eq!(spec.materialize().unwrap().lines.len(), 0);
    }
}
