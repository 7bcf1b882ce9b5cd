//! MusicLMS E2E CLI Library
//!
//! Command-line front end for the MusicLMS end-to-end suite: configuration
//! resolution, test selection, console progress and listings.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod listing;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, DataArgs, FormatArg, ListArgs, LogFormatArg, RunArgs,
};
pub use config::{
    apply_run_args, config_path, load_suite_config, CliConfig, ColorChoice, Verbosity,
    DEFAULT_CONFIG_FILE,
};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter};
pub use runner::TestRunner;
