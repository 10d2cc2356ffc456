//! SVG charts for delayscope.
//!
//! Every chart is described by a [`ChartRequest`] and rendered from a
//! [`Table`] into the output directory of a [`ResultStore`], one file per
//! call.

use std::path::PathBuf;

use delayscope_data::{error::AnalysisError, store::ResultStore, table::Table};
use plotters::drawing::DrawingAreaErrorKind;
use tracing::info;

mod axis;
mod delays;
mod distribution;
mod frequency;
mod palette;
mod scatter;

pub use delays::DELAY_COLUMNS;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ChartError {
    #[display("{source}")]
    Analysis { source: AnalysisError },
    #[display("Failed to draw chart: {message}")]
    Draw { message: String },
}

impl From<AnalysisError> for ChartError {
    fn from(source: AnalysisError) -> Self {
        Self::Analysis { source }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw {
            message: err.to_string(),
        }
    }
}

/// A chart to render.
///
/// Charts grouped by region expect the table to already have a `region`
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartRequest {
    /// Line chart of how often each value of a column occurs.
    Frequency { column: String },
    /// Average of each delay column per carrier, carriers ordered by arrival delay.
    DelaysByCarrier,
    /// 30-bin histogram of a numeric column.
    Histogram { column: String },
    Violin { column: String },
    Box { column: String },
    Scatter { x: String, y: String },
}

impl ChartRequest {
    /// File name without extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        match self {
            Self::Frequency { column } => format!("{column}_frequency_plot"),
            Self::DelaysByCarrier => "average_delays_by_carrier".to_owned(),
            Self::Histogram { column } => format!("histogram_{column}"),
            Self::Violin { column } => format!("violin_{column}"),
            Self::Box { column } => format!("box_{column}"),
            Self::Scatter { x, y } => format!("scatter_{x}_vs_{y}"),
        }
    }

    /// Whether the chart reads the `region` column.
    #[must_use]
    pub fn needs_regions(&self) -> bool {
        matches!(
            self,
            Self::Violin { .. } | Self::Box { .. } | Self::Scatter { .. }
        )
    }

    /// Renders the chart and returns the path of the written SVG file.
    pub fn render(&self, table: &Table, store: &ResultStore) -> Result<PathBuf, ChartError> {
        table.require_data()?;
        let path = store.path_for(&self.file_stem(), "svg")?;
        match self {
            Self::Frequency { column } => frequency::draw(table, column, &path)?,
            Self::DelaysByCarrier => delays::draw(table, &path)?,
            Self::Histogram { column } => distribution::draw_histogram(table, column, &path)?,
            Self::Violin { column } => distribution::draw_violin(table, column, &path)?,
            Self::Box { column } => distribution::draw_box(table, column, &path)?,
            Self::Scatter { x, y } => scatter::draw(table, x, y, &path)?,
        }
        info!(path = %path.display(), "Chart saved");
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use delayscope_data::region;

    use super::*;

    pub(crate) const SAMPLE_CSV: &str = "\
carrier_name,airport,arr_flights,arr_delay,carrier_delay,weather_delay,nas_delay,security_delay,late_aircraft_delay
Delta Air Lines Inc.,ATL,100,250,100,10,40,0,100
Delta Air Lines Inc.,JFK,80,,20,5,10,0,30
United Air Lines Inc.,ORD,120,300,120,NA,80,5,95
SkyWest Airlines Inc.,ANC,40,90,30,0,20,0,40
United Air Lines Inc.,SEA,60,120,50,20,10,0,40
SkyWest Airlines Inc.,DEN,70,60,20,10,10,0,20
";

    pub(crate) fn sample_table() -> Table {
        let mut table = Table::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        region::categorize_airports(&mut table).unwrap();
        table
    }

    fn render(request: &ChartRequest) -> String {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let path = request.render(&sample_table(), &store).unwrap();
        assert_eq!(path, dir.path().join(format!("{}.svg", request.file_stem())));
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_render_every_chart() {
        let requests = [
            ChartRequest::Frequency {
                column: "carrier_name".to_owned(),
            },
            ChartRequest::Frequency {
                column: "arr_flights".to_owned(),
            },
            ChartRequest::DelaysByCarrier,
            ChartRequest::Histogram {
                column: "arr_delay".to_owned(),
            },
            ChartRequest::Violin {
                column: "arr_delay".to_owned(),
            },
            ChartRequest::Box {
                column: "weather_delay".to_owned(),
            },
            ChartRequest::Scatter {
                x: "arr_delay".to_owned(),
                y: "weather_delay".to_owned(),
            },
        ];
        for request in &requests {
            let svg = render(request);
            assert!(svg.contains("<svg"), "{request:?} produced no svg");
        }
    }

    #[test]
    fn test_not_a_number_cells_do_not_break_box_and_violin() {
        let csv = "\
airport,arr_delay
ATL,10
ATL,12
ATL,NAN
ORD,20
ORD,-nan
ORD,25
SEA,inf
SEA,30
SEA,35
";
        let mut table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        region::categorize_airports(&mut table).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        for request in [
            ChartRequest::Box {
                column: "arr_delay".to_owned(),
            },
            ChartRequest::Violin {
                column: "arr_delay".to_owned(),
            },
        ] {
            let path = request.render(&table, &store).unwrap();
            assert!(fs::read_to_string(path).unwrap().contains("<svg"));
        }
    }

    #[test]
    fn test_titles_are_written() {
        let svg = render(&ChartRequest::Histogram {
            column: "arr_delay".to_owned(),
        });
        assert!(svg.contains("Distribution of arr_delay"));
    }

    #[test]
    fn test_unknown_column() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let err = ChartRequest::Histogram {
            column: "nope".to_owned(),
        }
        .render(&sample_table(), &store)
        .unwrap_err();
        assert!(matches!(
            err,
            ChartError::Analysis {
                source: AnalysisError::UnknownColumn { .. }
            }
        ));
    }

    #[test]
    fn test_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let err = ChartRequest::DelaysByCarrier
            .render(&Table::empty(), &store)
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::Analysis {
                source: AnalysisError::NoData
            }
        ));
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(
            ChartRequest::Scatter {
                x: "a".to_owned(),
                y: "b".to_owned()
            }
            .file_stem(),
            "scatter_a_vs_b"
        );
        assert!(!ChartRequest::DelaysByCarrier.needs_regions());
    }
}
