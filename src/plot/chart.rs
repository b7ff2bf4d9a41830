//! Renderer-facing view of a chart (embedded as JSON in the HTML report).

use crate::plot::PlotLine;
use serde::Serialize;

/// Line colors in emission order. Skipped slots still consume one.
pub const COLOR_CYCLE: [&str; 7] = [
    "blue", "red", "green", "cyan", "magenta", "#bfbf00", "black",
];

pub const X_LABEL: &str = "Frame";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    pub label: String,
    pub color: &'static str,
    pub axis: Axis,
    pub x: Vec<usize>,
    /// `null` in JSON: no point at this x.
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: &'static str,
    pub lines: Vec<ChartLine>,
    /// Only true if some line asked for the right axis.
    pub has_right_axis: bool,
}

impl ChartData {
    pub fn from_lines(title: &str, lines: Vec<Option<PlotLine>>, x_start: usize) -> Self {
        let colors = COLOR_CYCLE.iter().copied().cycle();

        let lines: Vec<ChartLine> = lines
            .into_iter()
            .zip(colors)
            .filter_map(|(line, color)| {
                let line = line?;
                let axis = if line.flags.right_axis {
                    Axis::Right
                } else {
                    Axis::Left
                };
                Some(ChartLine {
                    label: line.label,
                    color,
                    axis,
                    x: (x_start..x_start + line.values.len()).collect(),
                    y: line.values,
                })
            })
            .collect();

        let has_right_axis = lines.iter().any(|l| l.axis == Axis::Right);
        ChartData {
            title: title.to_string(),
            x_label: X_LABEL,
            lines,
            has_right_axis,
        }
    }
}
