use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use clap::{Args, Subcommand};
use delayscope_data::{session::AnalysisSession, store::ResultStore};
use delayscope_viz::ChartRequest;

use crate::{command::Context, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct ChartArg {
    #[command(subcommand)]
    chart: ChartKind,
}

#[derive(Debug, Clone, Subcommand)]
enum ChartKind {
    /// Line chart of how often each value occurs
    Frequency { column: String },
    /// Average of every delay column per carrier
    Delays,
    /// 30-bin histogram of a numeric column
    Histogram { column: String },
    /// Violin plot of a numeric column by region
    Violin { column: String },
    /// Box plot of a numeric column by region
    Box { column: String },
    /// Scatter plot of two numeric columns coloured by region
    Scatter { x: String, y: String },
}

impl From<ChartKind> for ChartRequest {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Frequency { column } => Self::Frequency { column },
            ChartKind::Delays => Self::DelaysByCarrier,
            ChartKind::Histogram { column } => Self::Histogram { column },
            ChartKind::Violin { column } => Self::Violin { column },
            ChartKind::Box { column } => Self::Box { column },
            ChartKind::Scatter { x, y } => Self::Scatter { x, y },
        }
    }
}

/// Renders `request`, adding the `region` column first when the chart needs it.
pub(crate) fn render(
    session: &mut AnalysisSession,
    request: &ChartRequest,
    store: &ResultStore,
) -> anyhow::Result<PathBuf> {
    if request.needs_regions() {
        session.ensure_regions()?;
    }
    let path = request.render(session.table(), store)?;
    Ok(path)
}

pub(crate) fn run(arg: &ChartArg, ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let request = ChartRequest::from(arg.chart.clone());
    let path = render(&mut session, &request, &util::chart_store(&ctx.config))?;

    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &serde_json::json!({ "chart": path }))?;
    } else {
        writeln!(stdout, "Chart saved: {}", path.display())?;
    }
    Ok(())
}
