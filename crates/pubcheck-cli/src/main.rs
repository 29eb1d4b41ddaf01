//! Pubcheck CLI - Command-line validation for digital publications
//!
//! This is the main entry point for the Pubcheck CLI application, providing
//! commands for validating audiobook manifests and catalog feeds.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::LoggingConfig;
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Initialize logging
    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    match run(cli) {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load_with_file(cli.config.as_deref())?;

    // Create output writer; the CLI flag wins over the config file
    let format = cli.output.unwrap_or_else(|| config.output_format());
    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Manifest(args) => handlers::handle_manifest(args, &mut output),
        Commands::Feed(args) => handlers::handle_feed(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
