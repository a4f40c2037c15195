//! Dot matrix comparing the AMR calls of several workflows.

use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use plotly::common::Font;
use plotly::common::Marker;
use plotly::common::Mode;
use plotly::common::Position;
use plotly::common::Title;
use plotly::layout::Axis;
use plotly::Layout;
use plotly::Scatter;
use serde::Deserialize;

use crate::plot::command::Figure;
use crate::plot::command::FigureSource;

/// Marker colour for each comparison outcome.
const COLORS: [(i8, &str); 3] = [(0, "#41B6C4"), (1, "#C7E9B4"), (-1, "#0C2C84")];

/// Marker size of each dot.
const DOT_SIZE: usize = 40;

/// One row of the workflow comparison CSV.
#[derive(Debug, Deserialize)]
pub struct WorkflowCall {
    /// The AMR gene.
    #[serde(rename = "AMR")]
    pub amr: String,

    /// The workflow that made the call.
    #[serde(rename = "WF")]
    pub workflow: String,

    /// Outcome of the comparison: `-1`, `0` or `1`.
    #[serde(rename = "Value")]
    pub value: i8,
}

/// Reads the comparison CSV.
pub fn read_calls(path: &Path) -> anyhow::Result<Vec<WorkflowCall>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening workflow comparison: {}", path.display()))?;

    let mut calls = Vec::new();
    for result in reader.deserialize() {
        let call: WorkflowCall =
            result.with_context(|| format!("parsing workflow comparison: {}", path.display()))?;
        calls.push(call);
    }

    Ok(calls)
}

/// Struct that represents the workflow comparison dot matrix.
pub struct WorkflowComparisonPlot;

impl WorkflowComparisonPlot {
    /// Builds the figure from already loaded calls.
    pub fn from_calls(&self, calls: &[WorkflowCall]) -> anyhow::Result<plotly::Plot> {
        if calls.is_empty() {
            bail!("no workflow calls to plot");
        }

        if let Some(call) = calls
            .iter()
            .find(|c| !COLORS.iter().any(|(v, _)| *v == c.value))
        {
            bail!(
                "unsupported value {} for {} / {}",
                call.value,
                call.amr,
                call.workflow
            );
        }

        let mut plot = plotly::Plot::new();
        for (value, color) in COLORS {
            let selected: Vec<&WorkflowCall> = calls.iter().filter(|c| c.value == value).collect();
            if selected.is_empty() {
                continue;
            }

            let x: Vec<String> = selected.iter().map(|c| c.amr.clone()).collect();
            let y: Vec<String> = selected.iter().map(|c| c.workflow.clone()).collect();
            let text: Vec<String> = selected.iter().map(|c| c.value.to_string()).collect();

            let trace = Scatter::new(x, y)
                .name(value.to_string())
                .mode(Mode::MarkersText)
                .text_array(text)
                .text_position(Position::MiddleCenter)
                .text_font(Font::new().color("white").size(20))
                .marker(Marker::new().size(DOT_SIZE).color(color));

            plot.add_trace(trace);
        }

        let layout = Layout::new()
            .title(Title::new(self.name()))
            .x_axis(
                Axis::new()
                    .title(Title::new("Workflow Comparison"))
                    .tick_angle(45.0)
                    .show_grid(false),
            )
            .y_axis(Axis::new().show_grid(false));

        plot.set_layout(layout);
        Ok(plot)
    }
}

impl Figure for WorkflowComparisonPlot {
    fn name(&self) -> &'static str {
        "Workflow Comparison"
    }

    fn description(&self) -> &'static str {
        "Shows, per AMR gene, how the calls of each workflow compare."
    }

    fn filename(&self) -> &'static str {
        "workflow-comparison"
    }

    fn generate(&self, source: &FigureSource) -> anyhow::Result<plotly::Plot> {
        let calls = read_calls(&source.path)?;
        self.from_calls(&calls)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_read_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.csv");
        fs::write(&path, "AMR,WF,Value\nblaTEM-1,galaxy,1\nblaTEM-1,local,-1\n").unwrap();

        let calls = read_calls(&path).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].workflow, "local");
        assert_eq!(calls[1].value, -1);
    }

    #[test]
    fn test_rejects_unknown_values_and_empty_input() {
        let calls = vec![WorkflowCall {
            amr: String::from("sul1"),
            workflow: String::from("galaxy"),
            value: 2,
        }];
        assert!(WorkflowComparisonPlot.from_calls(&calls).is_err());
        assert!(WorkflowComparisonPlot.from_calls(&[]).is_err());
    }

    #[test]
    fn test_plot_is_generated() {
        let calls = vec![
            WorkflowCall {
                amr: String::from("sul1"),
                workflow: String::from("galaxy"),
                value: 0,
            },
            WorkflowCall {
                amr: String::from("sul1"),
                workflow: String::from("local"),
                value: 1,
            },
        ];
        assert!(WorkflowComparisonPlot.from_calls(&calls).is_ok());
    }
}
