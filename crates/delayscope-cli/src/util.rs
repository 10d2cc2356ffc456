use std::io::{self, Write};

use anyhow::Context;
use delayscope_data::{
    session::{AnalysisSession, Notice},
    store::ResultStore,
};
use tracing::error;

use crate::config::Config;

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value).context("Failed to write JSON")?;
    writeln!(writer).context("Failed to write newline after JSON")?;
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

pub(crate) fn write_notices<W>(writer: &mut W, notices: &[Notice]) -> io::Result<()>
where
    W: Write,
{
    for notice in notices {
        match notice {
            Notice::Saved(path) => writeln!(writer, "Saved: {}", path.display())?,
            Notice::Warning(message) => writeln!(writer, "Warning: {message}")?,
        }
    }
    Ok(())
}

/// Prints the notices gathered by `session` to stderr, keeping stdout for results.
pub(crate) fn print_notices(session: &mut AnalysisSession) -> io::Result<()> {
    write_notices(&mut io::stderr().lock(), &session.take_notices())
}

/// Where charts go; charts are written even when result files are disabled.
pub(crate) fn chart_store(config: &Config) -> ResultStore {
    ResultStore::new(&config.output.dir)
}

/// Store for per-operation result files, absent when persistence is off.
pub(crate) fn result_store(config: &Config) -> Option<ResultStore> {
    config
        .output
        .save_results
        .then(|| ResultStore::new(&config.output.dir))
}

/// Prints an error with its causes and logs it.
pub(crate) fn report_error<W>(writer: &mut W, err: &anyhow::Error) -> io::Result<()>
where
    W: Write,
{
    error!("{err:#}");
    writeln!(writer, "An error occurred: {err:#}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_write_notices() {
        let mut out = Vec::new();
        write_notices(
            &mut out,
            &[
                Notice::Saved(PathBuf::from("Output/a.csv")),
                Notice::Warning("disk full".to_owned()),
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Saved: Output/a.csv\nWarning: disk full\n"
        );
    }

    #[test]
    fn test_result_store_follows_config() {
        let mut config = Config::default();
        assert!(result_store(&config).is_some());
        config.output.save_results = false;
        assert!(result_store(&config).is_none());
        assert_eq!(chart_store(&config).dir(), config.output.dir.as_path());
    }
}
