//! # Credential Commands
//!
//! Checking and storing the Jira credentials used by the other commands.

use anyhow::{Context, Result};
use backlog_core::creds::netrc::{get_netrc_path, normalize_host, write_netrc_entry};
use backlog_core::output::{print_info, print_success, print_warning};
use backlog_jira::auth::{check_jira_credentials, create_jira_runtime_and_client, get_jira_host};
use clap::{Args, Subcommand};
use directories::BaseDirs;

/// Command for credential management
#[derive(Args)]
pub struct CredsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CredsSubcommands,
}

/// Subcommands for the creds command
#[derive(Subcommand)]
pub enum CredsSubcommands {
  /// Check whether Jira credentials are configured and working
  Check,

  /// Store Jira credentials in ~/.netrc
  #[command(long_about = "Store Jira credentials in ~/.netrc.\n\n\
                   The host defaults to $JIRA_HOST. The token is a Jira API token,\n\
                   not your account password.")]
  Set {
    /// The Jira account username (usually an email address)
    #[arg(required = true, index = 1)]
    username: String,

    /// The Jira API token
    #[arg(required = true, index = 2)]
    token: String,

    /// Host to store the credentials for (defaults to $JIRA_HOST)
    #[arg(long)]
    host: Option<String>,
  },
}

/// Handle the creds command
pub fn handle_creds_command(creds: CredsArgs) -> Result<()> {
  match creds.subcommand {
    CredsSubcommands::Check => handle_check_command(),
    CredsSubcommands::Set { username, token, host } => handle_set_command(&username, &token, host.as_deref()),
  }
}

/// Handle the check command
fn handle_check_command() -> Result<()> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let jira_host = get_jira_host()?;
  print_info(&format!("Jira host: {jira_host}"));

  if !check_jira_credentials(base_dirs.home_dir(), &jira_host) {
    print_warning("No credentials found in ~/.netrc for this host.");
    return Err(anyhow::anyhow!(
      "Run 'backlog creds set <username> <token>' to store credentials"
    ));
  }
  print_success("Credentials found in ~/.netrc");

  let (rt, client) = create_jira_runtime_and_client(base_dirs.home_dir(), &jira_host)?;
  let healthy = rt.block_on(client.test_connection())?;
  if !healthy {
    return Err(anyhow::anyhow!(
      "Jira rejected the stored credentials; check the username and API token"
    ));
  }

  print_success("Connected to Jira successfully");
  Ok(())
}

/// Handle the set command
fn handle_set_command(username: &str, token: &str, host: Option<&str>) -> Result<()> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let jira_host = match host {
    Some(host) => host.to_string(),
    None => get_jira_host()?,
  };

  let machine = normalize_host(&jira_host);
  let netrc_path = get_netrc_path(base_dirs.home_dir());
  write_netrc_entry(&netrc_path, &machine, username, token)?;

  print_success(&format!("Stored credentials for '{machine}' in ~/.netrc"));
  Ok(())
}
