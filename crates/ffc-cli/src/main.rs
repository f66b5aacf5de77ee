//! ffcheck: flat file structure checker.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use ffc_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_checks, run_structures};
use crate::summary::print_summary;

/// Completed; findings only change the status with `--fail-on-findings`.
const EXIT_OK: u8 = 0;
const EXIT_FINDINGS: u8 = 1;
/// Configuration or I/O failure.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::from(EXIT_FATAL);
    }

    let result = match &cli.command {
        Command::Check(args) => run_check(args).map(|summary| {
            print_summary(&summary);
            if args.fail_on_findings && summary.outcome.has_findings() {
                EXIT_FINDINGS
            } else {
                EXIT_OK
            }
        }),
        Command::Checks(args) => run_checks(args).map(|()| EXIT_OK),
        Command::Structures(args) => run_structures(args).map(|()| EXIT_OK),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "run aborted");
            eprintln!("error: {error:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
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
    config.log_file.clone_from(&cli.log_file);
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
