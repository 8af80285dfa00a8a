//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the backlog tool,
//! including issue operations and credential management.

mod creds;
mod issue;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI command for the backlog tool
#[derive(Parser)]
#[command(name = "backlog")]
#[command(display_name = "📋 Backlog")]
#[command(about = "A command-line Jira client for backlog grooming")]
#[command(
  long_about = "Backlog is a Jira client for the terminal.\n\n\
        It provides commands for viewing, assigning, linking, and commenting on\n\
        issues, recording worklogs, and re-ranking issues within the backlog."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// The subcommand to execute
  #[command(subcommand)]
  pub command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand)]
pub enum Commands {
  /// Work with Jira issues
  Issue(issue::IssueArgs),

  /// Manage Jira credentials
  Creds(creds::CredsArgs),
}

/// Dispatch the parsed CLI command to its handler
pub fn handle_cli(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Issue(args) => issue::handle_issue_command(args),
    Commands::Creds(args) => creds::handle_creds_command(args),
  }
}
