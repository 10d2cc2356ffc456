use std::{collections::BTreeMap, path::Path};

use delayscope_data::{error::AnalysisError, region::REGION_COLUMN, table::Table};
use plotters::prelude::*;

use crate::{ChartError, axis, palette};

/// Points of `x` against `y` coloured by region; rows missing either value are skipped.
pub(crate) fn draw(table: &Table, x: &str, y: &str, path: &Path) -> Result<(), ChartError> {
    let xs = table.numeric_column(x)?;
    let ys = table.numeric_column(y)?;
    let regions = table.column(REGION_COLUMN)?;

    let mut groups = BTreeMap::<String, Vec<(f64, f64)>>::new();
    for (row, (xv, yv)) in xs.iter().zip(ys).enumerate() {
        if let (Some(xv), Some(yv)) = (xv, yv) {
            let region = regions
                .category(row)
                .map_or_else(String::new, |r| r.to_string());
            groups.entry(region).or_default().push((*xv, *yv));
        }
    }
    if groups.is_empty() {
        return Err(AnalysisError::NoValues {
            column: format!("{x}/{y}"),
        }
        .into());
    }

    let points = || groups.values().flatten();
    let x_range = axis::padded_range(points().map(|p| p.0), 0.05);
    let y_range = axis::padded_range(points().map(|p| p.1), 0.05);

    let root = SVGBackend::new(path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{y} vs {x} by Region"), ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().x_desc(x).y_desc(y).draw()?;

    for (index, (region, group)) in groups.iter().enumerate() {
        let color = palette::series(index);
        chart
            .draw_series(
                group
                    .iter()
                    .map(|&p| Circle::new(p, 4, color.mix(0.8).filled())),
            )?
            .label(region.as_str())
            .legend(move |(px, py)| Circle::new((px + 10, py), 4, color.filled()));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
