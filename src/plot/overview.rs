//! Heat map of which sample has results of which type.

use anyhow::bail;
use plotly::common::Title;
use plotly::layout::Axis;
use plotly::HeatMap;
use plotly::Layout;

use crate::matrix::Matrix;
use crate::organise::SampleIndex;
use crate::overview::build_overview;
use crate::overview::presence_only;
use crate::plot::command::Figure;
use crate::plot::command::FigureSource;

/// Struct that represents the sample overview heat map.
pub struct SampleOverviewPlot;

impl SampleOverviewPlot {
    /// Builds the figure from a presence matrix (types × samples).
    pub fn from_presence(&self, presence: Matrix) -> anyhow::Result<plotly::Plot> {
        if presence.is_empty() {
            bail!("no samples to plot");
        }

        let x = presence.column_labels().to_vec();
        let y = presence.row_labels().to_vec();
        let z = presence.into_values();

        let trace = HeatMap::new(x, y, z).name("");

        let mut plot = plotly::Plot::new();
        plot.add_trace(trace);

        let layout = Layout::new()
            .title(Title::new(self.name()))
            .x_axis(
                Axis::new()
                    .title(Title::new("Sample"))
                    .tick_angle(45.0),
            )
            .y_axis(Axis::new().title(Title::new("Type")));
        plot.set_layout(layout);

        Ok(plot)
    }
}

impl Figure for SampleOverviewPlot {
    fn name(&self) -> &'static str {
        "Sample Overview"
    }

    fn description(&self) -> &'static str {
        "Shows which sample has a result file of which type."
    }

    fn filename(&self) -> &'static str {
        "sample-overview"
    }

    fn generate(&self, source: &FigureSource) -> anyhow::Result<plotly::Plot> {
        let index = SampleIndex::from_dir(&source.path, source.unclassifiable)?;
        let overview = build_overview(&index);
        self.from_presence(presence_only(&overview))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::config::Config;
    use crate::organise::index::Unclassifiable;

    #[test]
    fn test_empty_presence_is_an_error() {
        let empty = Matrix::filled(vec![], vec![], 0.0);
        assert!(SampleOverviewPlot.from_presence(empty).is_err());
    }

    #[test]
    fn test_generate_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A_1_mlst.tsv"), "Gene\t%Identity\n").unwrap();
        fs::write(dir.path().join("B_2_card.txt"), "Best_Hit_ARO\n").unwrap();

        let source = FigureSource {
            path: PathBuf::from(dir.path()),
            config: Config::default(),
            unclassifiable: Unclassifiable::Fail,
        };

        assert!(SampleOverviewPlot.generate(&source).is_ok());
    }
}
