//! MusicLMS E2E: browser tests for the MusicLMS web application
//!
//! ## Usage
//!
//! ```bash
//! musiclms-e2e run --app-url http://localhost:3000   # Run everything
//! musiclms-e2e run --groups sanity --headless          # Smoke subset
//! musiclms-e2e list --groups dataDriven                # Show the catalog
//! musiclms-e2e data PasswordValidation                 # Show a data set
//! ```

use clap::Parser;
use musiclms_e2e::{suites, Selection};
use musiclms_e2e_cli::{
    apply_run_args, listing, load_suite_config, Cli, CliConfig, CliResult, ColorChoice, Commands,
    ConfigArgs, DataArgs, ListArgs, LogFormatArg, RunArgs, TestRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_test_failure() => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_logging(config.verbosity, cli.log_format);

    match cli.command {
        Commands::Run(args) => run_suite(config, &args),
        Commands::List(args) => run_list(&args),
        Commands::Pages => {
            print!("{}", listing::render_pages());
            Ok(())
        }
        Commands::Data(args) => run_data(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over the verbosity flags
fn init_logging(verbosity: Verbosity, format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Json => builder.json().init(),
        LogFormatArg::Text => builder.init(),
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn selection(groups: &[String], filter: Option<&String>) -> Selection {
    let mut selection = Selection::all().with_groups(groups.iter().cloned());
    if let Some(filter) = filter {
        selection = selection.with_filter(filter.clone());
    }
    selection
}

fn run_suite(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let suite = load_suite_config(args.config.as_deref(), env_var)?;
    let suite = apply_run_args(suite, args)?;
    let selection = selection(&args.groups, args.filter.as_ref());

    TestRunner::new(config).run(suite, selection)?;
    Ok(())
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let selection = selection(&args.groups, args.filter.as_ref());
    let text = listing::render_cases(&suites::catalog(), &selection, args.format.into())?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_data(args: &DataArgs) -> CliResult<()> {
    let text = listing::render_data(&args.set, &args.data_dir, args.format.into())?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let suite = load_suite_config(args.config.as_deref(), env_var)?;
    print!("{}", suite.to_yaml()?);
    if args.validate {
        suite.validate()?;
        println!("# configuration is valid");
    }
    Ok(())
}
