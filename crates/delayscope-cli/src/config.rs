//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>`
//! 2. `$DELAYSCOPE_CONFIG`
//! 3. `./delayscope.toml`
//! 4. Built-in defaults (every field is optional)
//!
//! Command-line flags are applied on top with [`Config::apply_overrides`].

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_ENV: &str = "DELAYSCOPE_CONFIG";
const LOCAL_CONFIG_FILE: &str = "delayscope.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct DataConfig {
    /// CSV file loaded at startup.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    /// Directory for charts and result files, created on demand.
    pub dir: PathBuf,
    /// Write one result file per statistic, table and calculation.
    pub save_results: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Events are also appended here, without colours.
    pub file: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Input/airline_delay_2023.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Output"),
            save_results: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            file: None,
        }
    }
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub data: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_save: bool,
}

impl Config {
    /// Loads the first configuration file found, or defaults when there is none.
    ///
    /// A file named explicitly (flag or environment) must exist; the local
    /// `delayscope.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::read(&path),
            None => {
                let local = Path::new(LOCAL_CONFIG_FILE);
                if local.exists() {
                    Self::read(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(data) = &overrides.data {
            self.data.path.clone_from(data);
        }
        if let Some(output) = &overrides.output {
            self.output.dir.clone_from(output);
        }
        if overrides.no_save {
            self.output.save_results = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.dir, PathBuf::from("Output"));
        assert!(config.output.save_results);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
[output]
save_results = false

[logging]
level = "debug"
file = "app.log"
"#,
        )
        .unwrap();
        assert_eq!(config.data, DataConfig::default());
        assert_eq!(config.output.dir, PathBuf::from("Output"));
        assert!(!config.output.save_results);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("app.log")));
    }

    #[test]
    fn test_invalid_file() {
        assert!(Config::parse("[output]\nsave_results = \"yes\"").is_err());
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[data]\npath = \"flights.csv\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data.path, PathBuf::from("flights.csv"));

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&Overrides {
            data: Some(PathBuf::from("other.csv")),
            output: None,
            no_save: true,
        });
        assert_eq!(config.data.path, PathBuf::from("other.csv"));
        assert_eq!(config.output.dir, PathBuf::from("Output"));
        assert!(!config.output.save_results);
    }
}
