//! CLI argument definitions for ffcheck.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ffcheck",
    version,
    about = "Check flat files against declarative structure definitions",
    long_about = "Check delimited and fixed-width flat files against JSON structure definitions.\n\n\
                  Each file is matched to a structure by name, parsed, and run through the\n\
                  checks its structure lists. Findings are written to a ';'-delimited report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check files, or every file of the given directories.
    Check(CheckArgs),

    /// List available checks and where they come from.
    Checks(ConfigArgs),

    /// List loaded structure definitions.
    Structures(ConfigArgs),
}

/// Locations shared by every subcommand.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
    /// Run configuration file (TOML).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding structure definitions.
    #[arg(long = "structures-dir", value_name = "DIR")]
    pub structures_dir: Option<PathBuf>,

    /// File name pattern of structure definitions (default: struct_*.json).
    #[arg(long = "structure-pattern", value_name = "GLOB")]
    pub structure_pattern: Option<String>,

    /// Test case configuration file (JSON).
    #[arg(long = "test-configs", value_name = "FILE")]
    pub test_configs: Option<PathBuf>,

    /// Directory of external checks; may be repeated, earlier directories win.
    #[arg(long = "plugin-dir", value_name = "DIR")]
    pub plugin_dirs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Files or directories to check.
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Check every file against this structure instead of matching file names.
    #[arg(long = "file-structure", value_name = "NAME")]
    pub file_structure: Option<String>,

    /// Directory for the report (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the summary without writing a report.
    #[arg(long = "no-output")]
    pub no_output: bool,

    /// Skip structure definitions that fail to load and report them.
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: ReportFormatArg,

    /// Exit with status 1 when any check reports a finding.
    #[arg(long = "fail-on-findings")]
    pub fail_on_findings: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Csv,
    Json,
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
