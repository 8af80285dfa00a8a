//! Authentication helpers for the Jira client.
//!
//! These helpers centralize credential lookup and runtime construction so the
//! CLI commands share one authentication flow when talking to Jira.

use std::path::Path;

use anyhow::{Context, Result};
use backlog_core::creds::Credentials;
use backlog_core::creds::netrc::{get_netrc_path, normalize_host, parse_netrc_file};
pub use backlog_core::url::ENV_JIRA_HOST;
use backlog_core::url::resolve_jira_base_url;
use tokio::runtime::Runtime;

use crate::{JiraClient, create_jira_client};

/// Get the $JIRA_HOST environment variable value.
/// If the host doesn't include a scheme (http:// or https://), assumes https://.
pub fn get_jira_host() -> Result<String> {
  resolve_jira_base_url()
}

/// Check if Jira credentials are available for the provided host.
pub fn check_jira_credentials(home: &Path, jira_host: &str) -> bool {
  get_jira_credentials(home, jira_host).is_ok()
}

/// Retrieve Jira credentials from the user's `.netrc` file.
///
/// Looks up the normalized host first and falls back to a generic
/// `atlassian.net` entry so one token can cover several site aliases.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials> {
  let netrc_path = get_netrc_path(home);
  let normalized_host = normalize_host(jira_host);

  if netrc_path.exists() {
    if let Some(creds) = parse_netrc_file(&netrc_path, &normalized_host)? {
      return Ok(creds);
    }
    if let Some(creds) = parse_netrc_file(&netrc_path, "atlassian.net")? {
      return Ok(creds);
    }
  }

  Err(anyhow::anyhow!(
    "Jira credentials not found in .netrc file. Please add credentials for machine '{normalized_host}' or 'atlassian.net'."
  ))
}

/// Creates an authenticated Jira client using credentials from .netrc.
pub fn create_jira_client_from_netrc(home: &Path, jira_host: &str) -> Result<JiraClient> {
  let credentials = get_jira_credentials(home, jira_host).context("Failed to get credentials")?;

  Ok(create_jira_client(
    jira_host,
    &credentials.username,
    &credentials.password,
  ))
}

/// Creates a tokio runtime and an authenticated Jira client.
pub fn create_jira_runtime_and_client(home: &Path, jira_host: &str) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client_from_netrc(home, jira_host)?;
  Ok((rt, client))
}

#[cfg(test)]
mod tests {
  use backlog_test_utils::{EnvVarGuard, NetrcGuard};

  use super::*;

  #[test]
  fn test_get_jira_credentials() {
    let content = r#"machine custom-jira-host.com
  login custom@example.com
  password custom-token

machine atlassian.net
  login net@example.com
  password net-token
"#;
    let guard = NetrcGuard::new(content);

    let jira_creds = get_jira_credentials(guard.home_dir(), "custom-jira-host.com").unwrap();
    assert_eq!(jira_creds.username, "custom@example.com");
    assert_eq!(jira_creds.password, "custom-token");

    // Unknown hosts fall back to the atlassian.net entry
    let jira_creds = get_jira_credentials(guard.home_dir(), "nonexistent-host.com").unwrap();
    assert_eq!(jira_creds.username, "net@example.com");
    assert_eq!(jira_creds.password, "net-token");
  }

  #[test]
  fn test_get_jira_credentials_normalizes_host() {
    let content = r#"machine company.atlassian.net
  login me@example.com
  password site-token
"#;
    let guard = NetrcGuard::new(content);

    let jira_creds = get_jira_credentials(guard.home_dir(), "https://company.atlassian.net/").unwrap();
    assert_eq!(jira_creds.username, "me@example.com");
  }

  #[test]
  fn test_get_jira_credentials_error_message() {
    let guard = NetrcGuard::new("");

    let error = get_jira_credentials(guard.home_dir(), "custom-jira-host.com")
      .unwrap_err()
      .to_string();
    assert!(error.contains("custom-jira-host.com"));
    assert!(error.contains("atlassian.net"));

    assert!(!check_jira_credentials(guard.home_dir(), "custom-jira-host.com"));
  }

  #[test]
  fn test_check_jira_credentials() {
    let content = r#"machine custom-jira-host.com
  login custom@example.com
  password custom-token
"#;
    let guard = NetrcGuard::new(content);

    assert!(check_jira_credentials(guard.home_dir(), "custom-jira-host.com"));
    assert!(!check_jira_credentials(guard.home_dir(), "nonexistent-host.com"));
  }

  #[test]
  fn test_get_jira_host_resolves_env() {
    let guard = EnvVarGuard::new(ENV_JIRA_HOST);
    guard.set("company.atlassian.net");

    assert_eq!(get_jira_host().unwrap(), "https://company.atlassian.net");
  }
}
