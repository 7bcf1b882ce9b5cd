//! CLI configuration and suite configuration resolution.
//!
//! Suite settings resolve in layers: defaults, then the YAML file, then
//! `MUSICLMS_*` environment variables, then command-line flags.

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};
use musiclms_e2e::{SessionPolicy, SuiteConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "musiclms-e2e.yaml";

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` filter for this level
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Explicit path, else the default file if it exists
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Defaults overlaid with the YAML file at `path` and environment variables
pub fn load_suite_config<F>(path: Option<&Path>, env: F) -> CliResult<SuiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(explicit) = path {
        if !explicit.is_file() {
            return Err(CliError::config(format!(
                "config file not found: {}",
                explicit.display()
            )));
        }
    }
    let mut config = match config_path(path) {
        Some(file) => {
            tracing::debug!(file = %file.display(), "loading configuration");
            SuiteConfig::load(&file)?
        }
        None => SuiteConfig::default(),
    };
    config.apply_env(env)?;
    Ok(config)
}

/// Overlay the flags of `run` onto `config`
pub fn apply_run_args(mut config: SuiteConfig, args: &RunArgs) -> CliResult<SuiteConfig> {
    if let Some(url) = &args.app_url {
        config.app_url.clone_from(url);
    }
    if let Some(browser) = &args.browser {
        config.browser.clone_from(browser);
    }
    if args.headless {
        config.headless = true;
    }
    if let Some(url) = &args.webdriver_url {
        config.webdriver_url.clone_from(url);
    }
    if let Some(parallel) = args.parallel {
        config.parallel = parallel;
    }
    if let Some(policy) = &args.session_policy {
        config.session_policy = policy.parse::<SessionPolicy>()?;
    }
    if let Some(dir) = &args.reports_dir {
        config.reports_dir.clone_from(dir);
    }
    if let Some(dir) = &args.screenshots_dir {
        config.screenshots_dir.clone_from(dir);
    }
    Ok(config)
}
