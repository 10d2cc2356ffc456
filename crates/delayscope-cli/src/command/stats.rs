use std::io::{self, Write as _};

use clap::{Args, ValueEnum};
use delayscope_data::descriptive::StatisticKind;

use crate::{command::Context, util};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Statistic {
    Mean,
    Median,
    Std,
    WeightedMean,
}

impl From<Statistic> for StatisticKind {
    fn from(value: Statistic) -> Self {
        match value {
            Statistic::Mean => Self::Mean,
            Statistic::Median => Self::Median,
            Statistic::Std => Self::Std,
            Statistic::WeightedMean => Self::WeightedMean,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct StatsArg {
    /// Numeric column to summarize
    column: String,
    /// Statistics to compute (comma-separated)
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["mean", "median", "std"]
    )]
    statistics: Vec<Statistic>,
    /// Weights column; adds the weighted mean when given
    #[arg(long)]
    weights: Option<String>,
}

impl StatsArg {
    /// Requested statistics, with the weighted mean added or checked against `--weights`.
    fn kinds(&self) -> anyhow::Result<Vec<StatisticKind>> {
        let mut kinds = self
            .statistics
            .iter()
            .map(|&s| StatisticKind::from(s))
            .collect::<Vec<_>>();
        let wants_weighted = kinds.contains(&StatisticKind::WeightedMean);
        match (&self.weights, wants_weighted) {
            (None, true) => anyhow::bail!("weighted-mean requires --weights <COLUMN>"),
            (Some(_), false) => kinds.push(StatisticKind::WeightedMean),
            _ => {}
        }
        Ok(kinds)
    }
}

pub(crate) fn run(arg: &StatsArg, ctx: &Context) -> anyhow::Result<()> {
    let kinds = arg.kinds()?;
    let mut session = ctx.open_session()?;

    let records = kinds
        .into_iter()
        .map(|kind| session.statistic(kind, &arg.column, arg.weights.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;
    util::print_notices(&mut session)?;

    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &records)?;
    } else {
        for record in &records {
            writeln!(stdout, "{record}")?;
        }
    }
    Ok(())
}
