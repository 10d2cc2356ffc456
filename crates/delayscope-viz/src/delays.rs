use std::{collections::BTreeMap, path::Path};

use delayscope_data::{
    error::AnalysisError,
    query::{ARRIVAL_DELAY_COLUMN, CARRIER_COLUMN},
    table::{Category, Table},
};
use plotters::{prelude::*, style::FontTransform};
use tracing::debug;

use crate::{ChartError, axis, palette};

/// Delay columns plotted per carrier, in legend order.
pub const DELAY_COLUMNS: [&str; 6] = [
    "arr_delay",
    "carrier_delay",
    "weather_delay",
    "nas_delay",
    "security_delay",
    "late_aircraft_delay",
];

/// `late_aircraft_delay` -> `Late Aircraft Delay`
fn legend_label(column: &str) -> String {
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One line per delay column present in the table, carriers on the x axis
/// ordered by descending mean arrival delay.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn draw(table: &Table, path: &Path) -> Result<(), ChartError> {
    let mut carriers = table.group_mean(CARRIER_COLUMN, ARRIVAL_DELAY_COLUMN)?;
    if carriers.is_empty() {
        return Err(AnalysisError::NoValues {
            column: ARRIVAL_DELAY_COLUMN.to_owned(),
        }
        .into());
    }
    carriers.sort_by(|a, b| b.1.total_cmp(&a.1));
    let position = carriers
        .iter()
        .enumerate()
        .map(|(i, (carrier, _))| (carrier.clone(), i as f64))
        .collect::<BTreeMap<Category, f64>>();
    let labels = carriers
        .iter()
        .map(|(carrier, _)| carrier.to_string())
        .collect::<Vec<_>>();

    let mut lines = Vec::new();
    for column in DELAY_COLUMNS {
        if !table.has_column(column) || !table.column(column)?.is_numeric() {
            debug!(column, "Delay column absent or not numeric; skipped");
            continue;
        }
        let mut points = table
            .group_mean(CARRIER_COLUMN, column)?
            .into_iter()
            .filter_map(|(carrier, mean)| Some((*position.get(&carrier)?, mean)))
            .collect::<Vec<_>>();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        lines.push((column, points));
    }

    let y_range = axis::padded_range(
        lines
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.1))
            .chain([0.0]),
        0.05,
    );

    let root = SVGBackend::new(path, (1500, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Average Delays by Carrier and Delay Type", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(120)
        .y_label_area_size(70)
        .build_cartesian_2d(axis::category_range(labels.len()), y_range)?;

    let format_carrier = |x: &f64| axis::category_label(&labels, *x);
    chart
        .configure_mesh()
        .x_desc("Carrier")
        .y_desc("Average Delay (minutes)")
        .x_labels(labels.len() + 1)
        .x_label_formatter(&format_carrier)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()?;

    for (index, (column, points)) in lines.into_iter().enumerate() {
        let color = palette::series(index);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(legend_label(column))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("late_aircraft_delay"), "Late Aircraft Delay");
        assert_eq!(legend_label("arr_delay"), "Arr Delay");
    }
}
