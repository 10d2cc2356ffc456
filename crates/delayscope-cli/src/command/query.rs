use std::io::{self, Write as _};

use clap::Args;
use delayscope_data::{query::Condition, table::Table};
use serde_json::{Map, Value};

use crate::{command::Context, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct QueryArg {
    /// Column to filter on
    column: String,
    /// Operator and value, e.g. "> 10" or "== Delta Air Lines Inc."
    condition: Condition,
    /// Number of matching rows to print
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &QueryArg, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let matched = session.query(&arg.column, &arg.condition)?;
    let shown = matched.head(arg.limit);

    let mut stdout = io::stdout().lock();
    if ctx.json {
        let json = serde_json::json!({
            "column": arg.column,
            "condition": arg.condition.to_string(),
            "matched": matched.row_count(),
            "rows": rows_json(&shown),
        });
        util::write_json(&mut stdout, &json)?;
    } else {
        writeln!(
            stdout,
            "{} rows where {} {}",
            matched.row_count(),
            arg.column,
            arg.condition
        )?;
        if !shown.is_empty() {
            writeln!(stdout, "{shown}")?;
        }
    }
    Ok(())
}

/// One object per row; missing cells become `null`.
pub(crate) fn rows_json(table: &Table) -> Vec<Value> {
    (0..table.row_count())
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|column| {
                    let value = column
                        .category(row)
                        .map_or(Value::Null, |cell| Value::String(cell.to_string()));
                    (column.name().to_owned(), value)
                })
                .collect::<Map<_, _>>()
                .into()
        })
        .collect()
}
