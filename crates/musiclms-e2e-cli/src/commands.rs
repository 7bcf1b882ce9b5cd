//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MusicLMS E2E: browser tests for the MusicLMS web application
#[derive(Parser, Debug)]
#[command(name = "musiclms-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the test suite against a live application
    Run(RunArgs),

    /// List test cases
    List(ListArgs),

    /// Print the locators of every page object
    Pages,

    /// Print the rows of a data set
    Data(DataArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// YAML configuration file (default: ./musiclms-e2e.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Browser to drive (chrome, firefox, edge)
    #[arg(short, long)]
    pub browser: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Base URL of the application under test
    #[arg(long)]
    pub app_url: Option<String>,

    /// WebDriver endpoint
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Only run tests in these groups
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Only run tests whose id or name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Number of test classes to run at once
    #[arg(short = 'j', long)]
    pub parallel: Option<usize>,

    /// Session reuse policy (per-class, per-test)
    #[arg(long)]
    pub session_policy: Option<String>,

    /// Directory for HTML/JSON/XML reports
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,

    /// Directory for failure screenshots
    #[arg(long)]
    pub screenshots_dir: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only list tests in these groups
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Only list tests whose id or name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the data command
#[derive(Parser, Debug)]
pub struct DataArgs {
    /// Data set name (LoginData, PasswordValidation, ...)
    pub set: String,

    /// Directory holding the tabular data files
    #[arg(short, long, default_value = "testdata")]
    pub data_dir: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// YAML configuration file (default: ./musiclms-e2e.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also check the configuration
    #[arg(long)]
    pub validate: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Listing format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Aligned text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
