//! Histogram, violin and box charts of a numeric column.

use std::{collections::BTreeMap, ops::Range, path::Path};

use delayscope_data::{error::AnalysisError, region::REGION_COLUMN, table::Table};
use delayscope_stats::{density::KernelDensity, histogram::Histogram, percentiles::BoxSummary};
use plotters::{
    coord::{Shift, cartesian::Cartesian2d, types::RangedCoordf64},
    prelude::*,
};

use crate::{ChartError, axis, palette};

const HISTOGRAM_BINS: usize = 30;
const VIOLIN_POINTS: usize = 100;
/// KDE curve extends this many bandwidths past the data.
const VIOLIN_CUT: f64 = 2.0;
/// Half of the horizontal space given to each group.
const HALF_WIDTH: f64 = 0.4;

/// Present values of `column` grouped by the `region` column, groups in name order.
pub(crate) fn values_by_region(
    table: &Table,
    column: &str,
) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
    let values = table.numeric_column(column)?;
    let regions = table.column(REGION_COLUMN)?;
    let mut groups = BTreeMap::<String, Vec<f64>>::new();
    for (row, value) in values.iter().enumerate() {
        if let (Some(value), Some(region)) = (value, regions.category(row)) {
            groups.entry(region.to_string()).or_default().push(*value);
        }
    }
    if groups.is_empty() {
        return Err(AnalysisError::NoValues {
            column: column.to_owned(),
        });
    }
    Ok(groups.into_iter().collect())
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn draw_histogram(table: &Table, column: &str, path: &Path) -> Result<(), ChartError> {
    let values = table.present_values(column)?;
    let histogram = Histogram::new(values, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (histogram.bins.first(), histogram.bins.last()) else {
        return Err(AnalysisError::NoValues {
            column: column.to_owned(),
        }
        .into());
    };
    let x_range = first.range.start..last.range.end;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {column}"), ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, axis::count_range(histogram.max_count() as f64))?;
    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
            palette::SKY_BLUE.filled(),
        )
    }))?;
    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;

    root.present()?;
    Ok(())
}

type GroupedChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Sets up a chart with one slot per group along x and `column` values on y.
fn grouped_chart<'a, 'b>(
    root: &'a DrawingArea<SVGBackend<'b>, Shift>,
    title: String,
    column: &str,
    labels: &[String],
    y_range: Range<f64>,
) -> Result<GroupedChart<'a, 'b>, ChartError> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis::category_range(labels.len()), y_range)?;
    let format_group = |x: &f64| axis::category_label(labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Region")
        .y_desc(column)
        .x_labels(labels.len() + 1)
        .x_label_formatter(&format_group)
        .draw()?;
    Ok(chart)
}

/// Mirrored kernel density outline per region.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn draw_violin(table: &Table, column: &str, path: &Path) -> Result<(), ChartError> {
    let groups = values_by_region(table, column)?;
    let labels = groups.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
    let curves = groups
        .iter()
        .map(|(_, values)| {
            KernelDensity::new(values.iter().copied())
                .map(|kde| kde.curve(VIOLIN_POINTS, VIOLIN_CUT))
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();
    let max_density = curves
        .iter()
        .flatten()
        .map(|&(_, density)| density)
        .fold(0.0, f64::max);
    let y_range = axis::padded_range(curves.iter().flatten().map(|&(y, _)| y), 0.02);

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = grouped_chart(
        &root,
        format!("Violin Plot of {column} by Region"),
        column,
        &labels,
        y_range,
    )?;

    let scale = if max_density > 0.0 {
        HALF_WIDTH / max_density
    } else {
        0.0
    };
    for (index, ((_, values), curve)) in groups.iter().zip(&curves).enumerate() {
        let center = index as f64;
        let color = palette::series(index);
        let outline = curve
            .iter()
            .map(|&(y, d)| (center + d * scale, y))
            .chain(curve.iter().rev().map(|&(y, d)| (center - d * scale, y)))
            .collect::<Vec<_>>();
        chart.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            color.mix(0.6).filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(outline, &BLACK)))?;

        if let Some(summary) = BoxSummary::new(values.iter().copied()) {
            chart.draw_series([
                PathElement::new(
                    vec![(center, summary.q1), (center, summary.q3)],
                    BLACK.stroke_width(4),
                ),
                PathElement::new(
                    vec![(center - 0.05, summary.median), (center + 0.05, summary.median)],
                    WHITE.stroke_width(2),
                ),
            ])?;
        }
    }

    root.present()?;
    Ok(())
}

/// Quartile box with 1.5 × IQR whiskers and outlier points per region.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn draw_box(table: &Table, column: &str, path: &Path) -> Result<(), ChartError> {
    let groups = values_by_region(table, column)?;
    let labels = groups.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
    let y_range = axis::padded_range(
        groups.iter().flat_map(|(_, values)| values.iter().copied()),
        0.05,
    );

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = grouped_chart(
        &root,
        format!("Box Plot of {column} by Region"),
        column,
        &labels,
        y_range,
    )?;

    let half = HALF_WIDTH * 0.75;
    for (index, (_, values)) in groups.iter().enumerate() {
        let Some(summary) = BoxSummary::new(values.iter().copied()) else {
            continue;
        };
        let center = index as f64;
        let color = palette::series(index);

        chart.draw_series([
            Rectangle::new(
                [(center - half, summary.q1), (center + half, summary.q3)],
                color.mix(0.7).filled(),
            ),
            Rectangle::new(
                [(center - half, summary.q1), (center + half, summary.q3)],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series([
            PathElement::new(
                vec![(center - half, summary.median), (center + half, summary.median)],
                BLACK.stroke_width(2),
            ),
            PathElement::new(
                vec![(center, summary.q3), (center, summary.whisker_high)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(center, summary.q1), (center, summary.whisker_low)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![
                    (center - half / 2.0, summary.whisker_high),
                    (center + half / 2.0, summary.whisker_high),
                ],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![
                    (center - half / 2.0, summary.whisker_low),
                    (center + half / 2.0, summary.whisker_low),
                ],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            summary
                .outliers
                .iter()
                .map(|&y| Circle::new((center, y), 3, BLACK.stroke_width(1))),
        )?;
    }

    root.present()?;
    Ok(())
}
