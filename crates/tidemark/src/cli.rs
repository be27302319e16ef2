use std::ffi::OsStr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tidemark_config::GridStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid log format '{other}', expected one of: human, json"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ReportArgs {
    #[arg(help = "File path the metric was recorded for, as stored in the cache")]
    pub path: String,

    #[arg(help = "Metric to report on, as <operator>.<key> (see list-metrics)")]
    pub metric: String,

    #[arg(
        short = 'n',
        long = "number",
        help = "Number of revisions to show per archiver (defaults to [report].default_limit)"
    )]
    pub limit: Option<u32>,

    #[arg(long, help = "Include the commit message column")]
    pub message: bool,

    #[arg(long, help = "Disable terminal colors for deltas")]
    pub no_color: bool,

    #[arg(
        long,
        value_parser = parse_grid_style,
        help = "Table style: ascii, modern, rounded, markdown, psql, or blank"
    )]
    pub style: Option<GridStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Show the history of one metric across cached revisions
    Report(ReportArgs),
    /// List every metric that can be reported on
    ListMetrics,
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Metric history reports over a revision cache")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Workspace root containing the .tidemark cache"
    )]
    pub workspace: PathBuf,

    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = parse_log_format,
        help = "Log format: human or json"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_cli() -> Cli {
    let mut args: Vec<_> = std::env::args_os().collect();
    if args.get(1).is_some_and(|arg| arg == OsStr::new("--")) {
        args.remove(1);
    }

    Cli::parse_from(args)
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

fn parse_grid_style(value: &str) -> Result<GridStyle, String> {
    value.parse()
}
