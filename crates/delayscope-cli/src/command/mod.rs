use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use delayscope_data::{session::AnalysisSession, table::Table};
use tracing::debug;

use crate::{
    config::{Config, Overrides},
    logging, util,
};

use self::{
    chart::ChartArg, columns::ColumnsArg, combinatorics::CombinatoricsArg, crosstab::CrosstabArg,
    menu::MenuArg, query::QueryArg, stats::StatsArg, vector::VectorArg,
};

mod chart;
mod columns;
mod combinatorics;
mod crosstab;
mod menu;
mod query;
mod stats;
mod vector;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    global: GlobalArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Default, Args)]
struct GlobalArg {
    /// Configuration file (default: $DELAYSCOPE_CONFIG, then ./delayscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CSV file to analyze
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Directory for charts and result files
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Do not write result files for statistics, tables and calculations
    #[arg(long, global = true)]
    no_save: bool,
    /// Print structured results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Interactive numbered menu (default)
    Menu(#[clap(flatten)] MenuArg),
    /// Mean, median, standard deviation or weighted mean of a column
    Stats(#[clap(flatten)] StatsArg),
    /// Joint counts or probability table of two columns
    Crosstab(#[clap(flatten)] CrosstabArg),
    /// Permutations and combinations
    Combinatorics(#[clap(flatten)] CombinatoricsArg),
    /// Vector operations between two numeric columns
    Vector(#[clap(flatten)] VectorArg),
    /// Rows whose column satisfies a condition
    Query(#[clap(flatten)] QueryArg),
    /// Render a chart into the output directory
    Chart(#[clap(flatten)] ChartArg),
    /// List numeric and categorical columns
    Columns(#[clap(flatten)] ColumnsArg),
}

/// Settings shared by every mode once flags and the config file are merged.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub config: Config,
    pub json: bool,
}

impl Context {
    /// Loads the configured CSV. A missing or unreadable file yields an empty
    /// table; the reason is printed to stderr.
    pub fn open_session(&self) -> anyhow::Result<AnalysisSession> {
        let mut session =
            AnalysisSession::load(&self.config.data.path, util::result_store(&self.config));
        util::print_notices(&mut session)?;
        Ok(session)
    }

    /// A session over an empty table, for operations that never read the dataset.
    pub fn detached_session(&self) -> AnalysisSession {
        AnalysisSession::new(Table::empty(), util::result_store(&self.config))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let global = args.global;

    let mut config = Config::load(global.config.as_deref())?;
    config.apply_overrides(&Overrides {
        data: global.data,
        output: global.output,
        no_save: global.no_save,
    });
    logging::init(&config.logging)?;
    debug!(?config, "Configuration loaded");

    let ctx = Context {
        config,
        json: global.json,
    };
    match args.mode.unwrap_or(Mode::Menu(MenuArg::default())) {
        Mode::Menu(arg) => menu::run(&arg, &ctx)?,
        Mode::Stats(arg) => stats::run(&arg, &ctx)?,
        Mode::Crosstab(arg) => crosstab::run(&arg, &ctx)?,
        Mode::Combinatorics(arg) => combinatorics::run(&arg, &ctx)?,
        Mode::Vector(arg) => vector::run(&arg, &ctx)?,
        Mode::Query(arg) => query::run(&arg, &ctx)?,
        Mode::Chart(arg) => chart::run(&arg, &ctx)?,
        Mode::Columns(arg) => columns::run(&arg, &ctx)?,
    }
    Ok(())
}
