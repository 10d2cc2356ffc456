use std::io;

use clap::Args;

use crate::{command::Context, report, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct VectorArg {
    /// First numeric column
    left: String,
    /// Second numeric column
    right: String,
    /// Print every element instead of the first five
    #[arg(long)]
    full: bool,
}

pub(crate) fn run(arg: &VectorArg, ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let vector_report = session.vector_ops(&arg.left, &arg.right)?;
    util::print_notices(&mut session)?;

    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &vector_report)?;
    } else {
        report::write_vector_report(&mut stdout, &vector_report, arg.full)?;
    }
    Ok(())
}
