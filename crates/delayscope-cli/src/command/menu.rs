//! Numbered interactive menu.
//!
//! Reads choices line by line from any [`BufRead`] and writes prompts and
//! results to any [`Write`]. A failing command prints its error and returns
//! to the menu; end of input ends the session.

use std::io::{self, BufRead, Write};

use clap::Args;
use delayscope_data::{
    combinatorics::{self, Calculation},
    descriptive::StatisticKind,
    query::Condition,
    session::AnalysisSession,
    store::ResultStore,
};
use delayscope_viz::ChartRequest;
use tracing::info;

use crate::{
    command::{Context, chart},
    report, util,
};

const MAIN_MENU: &str = "
Airline Delay Analysis
 1. Value frequencies of a column
 2. Compare average delays by carrier
 3. Arrival delay records for a carrier
 4. Query rows with a condition
 5. Violin plot by region
 6. Box plot by region
 7. Scatter plot of two columns
 8. Mean
 9. Median
10. Standard deviation
11. Probability tables
12. Vector operations
13. Histogram
14. Combinatorics
15. Exit
16. Statistics cache";

const MEAN_MENU: &str = "
1. Simple mean
2. Weighted mean";

const PROBABILITY_MENU: &str = "
1. Joint probability
2. Conditional probability
3. Joint counts
4. Back";

const COMBINATORICS_MENU: &str = "
1. Analyze a categorical column
2. Permutation P(n, r)
3. Combination C(n, r)
4. Permutation with repetition n^r
5. Combination with repetition
6. Circular permutation (n-1)!
7. Permutations of a multiset
8. Back";

const CACHE_MENU: &str = "
1. List cached statistics
2. Invalidate a column
3. Clear the cache
4. Export a snapshot
5. Back";

/// Rows of a query result printed before the rest is elided.
const QUERY_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Default, Clone, Args)]
pub(crate) struct MenuArg {}

pub(crate) fn run(_arg: &MenuArg, ctx: &Context) -> anyhow::Result<()> {
    let session = AnalysisSession::load(&ctx.config.data.path, util::result_store(&ctx.config));
    info!(path = %ctx.config.data.path.display(), "Starting interactive menu");
    let mut menu = Menu::new(
        session,
        util::chart_store(&ctx.config),
        io::stdin().lock(),
        io::stdout().lock(),
    );
    menu.run()
}

/// Input ran out while a prompt was waiting.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Input ended")]
struct EndOfInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub(crate) struct Menu<R, W> {
    session: AnalysisSession,
    charts: ResultStore,
    input: R,
    output: W,
}

impl<R, W> Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(session: AnalysisSession, charts: ResultStore, input: R, output: W) -> Self {
        Self {
            session,
            charts,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.flush_notices()?;
        let table = self.session.table();
        writeln!(
            self.output,
            "Loaded {} rows x {} columns",
            table.row_count(),
            table.column_count()
        )?;

        loop {
            writeln!(self.output, "{MAIN_MENU}")?;
            let flow = self
                .prompt("Enter your choice (1-16): ")
                .and_then(|choice| self.dispatch(&choice));
            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) if err.is::<EndOfInput>() => break,
                Err(err) => util::report_error(&mut self.output, &err)?,
            }
            self.flush_notices()?;
        }
        self.flush_notices()?;
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> anyhow::Result<Flow> {
        match choice {
            "1" => self.frequencies()?,
            "2" => self.chart(&ChartRequest::DelaysByCarrier)?,
            "3" => self.carrier_delays()?,
            "4" => self.query()?,
            "5" => {
                let column = self.prompt_column("Column for the violin plot: ")?;
                self.chart(&ChartRequest::Violin { column })?;
            }
            "6" => {
                let column = self.prompt_column("Column for the box plot: ")?;
                self.chart(&ChartRequest::Box { column })?;
            }
            "7" => {
                let x = self.prompt_column("Column for the x axis: ")?;
                let y = self.prompt_column("Column for the y axis: ")?;
                self.chart(&ChartRequest::Scatter { x, y })?;
            }
            "8" => self.mean()?,
            "9" => self.statistic(StatisticKind::Median)?,
            "10" => self.statistic(StatisticKind::Std)?,
            "11" => self.probability()?,
            "12" => self.vector_ops()?,
            "13" => {
                self.list_numeric_columns()?;
                let column = self.prompt_column("Column for the histogram: ")?;
                self.chart(&ChartRequest::Histogram { column })?;
            }
            "14" => self.combinatorics()?,
            "15" => return Ok(Flow::Exit),
            "16" => self.cache()?,
            other => writeln!(
                self.output,
                "Invalid choice '{other}'. Enter a number from 1 to 16."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, message: &str) -> anyhow::Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim().to_owned())
    }

    fn prompt_column(&mut self, message: &str) -> anyhow::Result<String> {
        let column = self.prompt(message)?;
        if column.is_empty() {
            anyhow::bail!("No column name given");
        }
        Ok(column)
    }

    fn flush_notices(&mut self) -> io::Result<()> {
        util::write_notices(&mut self.output, &self.session.take_notices())
    }

    fn list_numeric_columns(&mut self) -> io::Result<()> {
        let names = self.session.table().numeric_column_names().collect::<Vec<_>>();
        writeln!(self.output, "Numeric columns: {}", names.join(", "))
    }

    fn list_categorical_columns(&mut self) -> io::Result<()> {
        let names = self
            .session
            .table()
            .categorical_column_names()
            .collect::<Vec<_>>();
        writeln!(self.output, "Categorical columns: {}", names.join(", "))
    }

    fn chart(&mut self, request: &ChartRequest) -> anyhow::Result<()> {
        let path = chart::render(&mut self.session, request, &self.charts)?;
        writeln!(self.output, "Chart saved: {}", path.display())?;
        Ok(())
    }

    fn frequencies(&mut self) -> anyhow::Result<()> {
        let column = self.prompt_column("Column to count: ")?;
        let frequencies = self.session.value_frequencies(&column)?;
        report::write_frequencies(&mut self.output, &column, &frequencies)?;
        self.chart(&ChartRequest::Frequency { column })
    }

    fn carrier_delays(&mut self) -> anyhow::Result<()> {
        let carrier = self.prompt("Carrier name: ")?;
        let count = self.session.carrier_delay_count(&carrier)?;
        writeln!(
            self.output,
            "Arrival delay records for {carrier}: {count}"
        )?;
        Ok(())
    }

    fn query(&mut self) -> anyhow::Result<()> {
        let column = self.prompt_column("Column to filter: ")?;
        let condition = self
            .prompt("Condition (e.g. '> 10' or '== Delta Air Lines Inc.'): ")?
            .parse::<Condition>()?;
        let matched = self.session.query(&column, &condition)?;
        writeln!(
            self.output,
            "{} rows where {column} {condition}",
            matched.row_count()
        )?;
        if !matched.is_empty() {
            writeln!(self.output, "{}", matched.head(QUERY_PREVIEW_ROWS))?;
        }
        Ok(())
    }

    fn mean(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{MEAN_MENU}")?;
        match self.prompt("Enter your choice: ")?.as_str() {
            "1" => self.statistic(StatisticKind::Mean),
            "2" => self.statistic(StatisticKind::WeightedMean),
            other => anyhow::bail!("Invalid mean type '{other}'"),
        }
    }

    fn statistic(&mut self, kind: StatisticKind) -> anyhow::Result<()> {
        let column = self.prompt_column("Column: ")?;
        let weights = if kind == StatisticKind::WeightedMean {
            Some(self.prompt_column("Weights column: ")?)
        } else {
            None
        };
        let record = self.session.statistic(kind, &column, weights.as_deref())?;
        writeln!(self.output, "{record}")?;
        Ok(())
    }

    fn probability(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{PROBABILITY_MENU}")?;
        let choice = self.prompt("Enter your choice: ")?;
        if choice == "4" {
            return Ok(());
        }
        if !["1", "2", "3"].contains(&choice.as_str()) {
            anyhow::bail!("Invalid probability option '{choice}'");
        }
        let a = self.prompt_column("First column: ")?;
        let b = self.prompt_column("Second column: ")?;
        match choice.as_str() {
            "1" => {
                let table = self.session.joint_probability(&a, &b)?;
                report::write_probabilities(&mut self.output, &a, &table)?;
            }
            "2" => {
                let table = self.session.conditional_probability(&a, &b)?;
                writeln!(self.output, "P({b} | {a})")?;
                report::write_probabilities(&mut self.output, &a, &table)?;
            }
            _ => {
                let counts = self.session.joint_counts(&a, &b)?;
                report::write_joint_counts(&mut self.output, &a, &counts)?;
            }
        }
        Ok(())
    }

    fn vector_ops(&mut self) -> anyhow::Result<()> {
        self.list_numeric_columns()?;
        let left = self.prompt_column("First column: ")?;
        let right = self.prompt_column("Second column: ")?;
        let vector_report = self.session.vector_ops(&left, &right)?;
        report::write_vector_report(&mut self.output, &vector_report, false)?;
        Ok(())
    }

    fn combinatorics(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{COMBINATORICS_MENU}")?;
        let calculation = match self.prompt("Enter your choice: ")?.as_str() {
            "1" => return self.column_combinations(),
            "2" => {
                let (n, r) = self.prompt_n_r()?;
                Calculation::Permutation { n, r }
            }
            "3" => {
                let (n, r) = self.prompt_n_r()?;
                Calculation::Combination { n, r }
            }
            "4" => {
                let (n, r) = self.prompt_n_r()?;
                Calculation::PermutationWithRepetition { n, r }
            }
            "5" => {
                let (n, r) = self.prompt_n_r()?;
                Calculation::CombinationWithRepetition { n, r }
            }
            "6" => Calculation::CircularPermutation {
                n: self.prompt_count("n")?,
            },
            "7" => {
                let input = self.prompt("Frequencies (e.g. 2,1,1): ")?;
                Calculation::PermutationFromFrequencies {
                    frequencies: combinatorics::parse_frequencies(&input)?,
                }
            }
            "8" => return Ok(()),
            other => anyhow::bail!("Invalid combinatorics option '{other}'"),
        };
        let record = self.session.combinatorics(&calculation)?;
        report::write_combinatorics(&mut self.output, &calculation, &record)?;
        Ok(())
    }

    fn prompt_count(&mut self, name: &str) -> anyhow::Result<u64> {
        let input = self.prompt(&format!("{name}: "))?;
        Ok(combinatorics::parse_count(name, &input)?)
    }

    fn prompt_n_r(&mut self) -> anyhow::Result<(u64, u64)> {
        Ok((self.prompt_count("n")?, self.prompt_count("r")?))
    }

    fn column_combinations(&mut self) -> anyhow::Result<()> {
        self.list_categorical_columns()?;
        let column = self.prompt_column("Column: ")?;
        let values = self.session.value_frequencies(&column)?;
        let r = self.prompt_count("r")?;
        let analysis = self.session.analyze_column_combinations(&column, r)?;
        report::write_column_combinations(&mut self.output, &analysis, &values)?;
        Ok(())
    }

    fn cache(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "\nStatistics cache ({} entries){CACHE_MENU}",
            self.session.cache().len()
        )?;
        match self.prompt("Enter your choice: ")?.as_str() {
            "1" => {
                for record in self.session.cache().records() {
                    writeln!(self.output, "  {record}")?;
                }
            }
            "2" => {
                let column = self.prompt_column("Column: ")?;
                let removed = self.session.invalidate(&column);
                writeln!(self.output, "Removed {removed} cached statistics for {column}")?;
            }
            "3" => {
                self.session.clear_cache();
                writeln!(self.output, "Cache cleared")?;
            }
            "4" => {
                let path = self.session.export_cache()?;
                writeln!(self.output, "Cache snapshot saved: {}", path.display())?;
            }
            "5" => {}
            other => anyhow::bail!("Invalid cache option '{other}'"),
        }
        Ok(())
    }
}
