//! # Backlog CLI Entry Point
//!
//! The main entry point for the backlog command-line tool, a Jira client
//! for grooming a backlog from the terminal.

use backlog_core::output::print_error;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

fn main() {
  // Parse CLI arguments using the derive-based implementation
  let cmd = cli::Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  // Initialize the tracing subscriber with the specified level
  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  // Failed commands exit non-zero; partial state is never rolled back
  if let Err(e) = cli::handle_cli(cmd) {
    print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}
