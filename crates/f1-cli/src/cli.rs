//! CLI argument definitions for the F1 warehouse loader.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use f1_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "f1-etl",
    version,
    about = "Load the F1 results snapshot into the PostgreSQL star schema",
    long_about = "Load the F1 results snapshot into the PostgreSQL star schema.\n\n\
                  Reads drivers, constructors, status, races, circuits and race_results\n\
                  CSV files, appends the four dimension tables, resolves surrogate keys\n\
                  and appends fact_results. The database URL comes from\n\
                  F1_ETL_DATABASE_URL, DATABASE_URL or the config file."
)]
pub struct Cli {
    /// TOML config file (default: ./f1-etl.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the six source CSV files.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            input_dir: self.input_dir.clone(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_with_defaults() {
        let cli = Cli::try_parse_from(["f1-etl"]).unwrap();
        let overrides = cli.config_overrides();
        assert!(overrides.config_path.is_none());
        assert!(overrides.input_dir.is_none());
        assert!(cli.report.is_none());
    }

    #[test]
    fn input_dir_and_report_are_parsed() {
        let cli = Cli::try_parse_from([
            "f1-etl",
            "--input-dir",
            "data/2024",
            "--report",
            "run.json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.input_dir, Some(PathBuf::from("data/2024")));
        assert_eq!(cli.report, Some(PathBuf::from("run.json")));
        assert!(matches!(cli.log_format, LogFormatArg::Json));
    }
}
