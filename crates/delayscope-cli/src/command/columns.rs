use std::io;

use clap::Args;

use crate::{
    command::Context,
    report::{self, ColumnsJson},
    util,
};

#[derive(Debug, Default, Clone, Args)]
pub(crate) struct ColumnsArg {}

pub(crate) fn run(_arg: &ColumnsArg, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let mut stdout = io::stdout().lock();
    if ctx.json {
        util::write_json(&mut stdout, &ColumnsJson::new(session.table()))?;
    } else {
        report::write_columns(&mut stdout, session.table())?;
    }
    Ok(())
}
