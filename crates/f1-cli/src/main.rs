//! F1 warehouse loader CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use f1_cli::config::EtlConfig;
use f1_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::commands::{ReportFile, run_load, write_report};
use crate::summary::{print_failure, print_summary};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = run(&cli).await;
    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> i32 {
    let config = match EtlConfig::from_env(&cli.config_overrides()) {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "invalid configuration");
            eprintln!("error: {error}");
            return 1;
        }
    };

    let outcome = run_load(&config).await;
    let exit_code = match &outcome {
        Ok(report) => {
            print_summary(report);
            0
        }
        Err(failure) => {
            error!(
                stage = %failure.stage,
                kind = %failure.kind(),
                tables_loaded = failure.loaded.len(),
                "{failure}"
            );
            print_failure(failure);
            1
        }
    };

    if let Some(path) = &cli.report
        && let Err(error) = write_report(path, &ReportFile::from_outcome(&outcome))
    {
        eprintln!("error: {error:#}");
        return 1;
    }
    exit_code
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
