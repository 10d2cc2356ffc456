use std::path::Path;

use delayscope_data::{
    error::AnalysisError,
    table::{Category, Table},
};
use plotters::prelude::*;

use crate::{ChartError, axis, palette};

/// Line chart of value counts, values in ascending order.
///
/// Text columns are placed at evenly spaced positions with the count
/// printed above each point; numeric columns use their values as x.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn draw(table: &Table, column: &str, path: &Path) -> Result<(), ChartError> {
    let mut frequencies = table.value_frequencies(column)?;
    if frequencies.is_empty() {
        return Err(AnalysisError::NoValues {
            column: column.to_owned(),
        }
        .into());
    }
    frequencies.sort_by(|a, b| a.0.cmp(&b.0));

    let labels = if table.column(column)?.is_numeric() {
        None
    } else {
        Some(
            frequencies
                .iter()
                .map(|(value, _)| value.to_string())
                .collect::<Vec<_>>(),
        )
    };
    let points = frequencies
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            let x = match value {
                Category::Number(n) if labels.is_none() => *n,
                _ => i as f64,
            };
            (x, *count as f64)
        })
        .collect::<Vec<_>>();

    let x_range = match &labels {
        Some(labels) => axis::category_range(labels.len()),
        None => axis::padded_range(points.iter().map(|p| p.0), 0.05),
    };
    let max_count = frequencies.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let root = SVGBackend::new(path, (1500, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Frequency of {column}"), ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, axis::count_range(max_count as f64))?;

    let format_category = |x: &f64| {
        labels
            .as_deref()
            .map(|labels| axis::category_label(labels, *x))
            .unwrap_or_default()
    };
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(column).y_desc("Frequency");
    if let Some(labels) = &labels {
        mesh.x_labels(labels.len() + 1)
            .x_label_formatter(&format_category);
    }
    mesh.draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        palette::SKY_BLUE.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 4, palette::SKY_BLUE.filled())),
    )?;
    if labels.is_some() {
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Text::new(y.to_string(), (x, y), ("sans-serif", 12))),
        )?;
    }

    root.present()?;
    Ok(())
}
