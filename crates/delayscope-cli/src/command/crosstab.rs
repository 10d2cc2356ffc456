use std::io;

use clap::{Args, ValueEnum};

use crate::{
    command::Context,
    report::{self, MatrixJson},
    util,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableKind {
    /// Co-occurrence counts
    #[default]
    Counts,
    /// Counts divided by the number of rows
    Joint,
    /// Counts divided by their row sum
    Conditional,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct CrosstabArg {
    /// Column whose values label the rows
    rows: String,
    /// Column whose values label the columns
    columns: String,
    #[arg(long, value_enum, default_value_t)]
    kind: TableKind,
}

pub(crate) fn run(arg: &CrosstabArg, ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let mut stdout = io::stdout().lock();
    let (a, b) = (arg.rows.as_str(), arg.columns.as_str());

    match arg.kind {
        TableKind::Counts => {
            let counts = session.joint_counts(a, b)?;
            util::print_notices(&mut session)?;
            if ctx.json {
                let json = MatrixJson::new(a, b, counts.rows(), counts.columns(), counts.counts());
                util::write_json(&mut stdout, &json)?;
            } else {
                report::write_joint_counts(&mut stdout, a, &counts)?;
            }
        }
        TableKind::Joint | TableKind::Conditional => {
            let table = if arg.kind == TableKind::Joint {
                session.joint_probability(a, b)?
            } else {
                session.conditional_probability(a, b)?
            };
            util::print_notices(&mut session)?;
            if ctx.json {
                let json = MatrixJson::new(a, b, table.rows(), table.columns(), table.values());
                util::write_json(&mut stdout, &json)?;
            } else {
                report::write_probabilities(&mut stdout, a, &table)?;
            }
        }
    }
    Ok(())
}
