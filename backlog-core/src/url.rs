//! URL parsing helpers shared across crates.
//!
//! These helpers live in `backlog-core` so both the CLI and the service
//! client can resolve and normalize the Jira host without depending on a
//! client instance.

use anyhow::Result;
use url::{Position, Url};

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Get the $JIRA_HOST environment variable value with proper URL scheme.
///
/// If the host doesn't include a scheme (http:// or https://), assumes
/// https://. Returns an error if the environment variable is not set.
pub fn resolve_jira_base_url() -> Result<String> {
  match std::env::var(ENV_JIRA_HOST) {
    Ok(host) => ensure_url_scheme(&host),
    Err(_) => Err(anyhow::anyhow!(
      "Jira host environment variable '{ENV_JIRA_HOST}' not set"
    )),
  }
}

/// Normalize a URL by dropping a bare "/" path while keeping query and
/// fragment intact.
fn normalize_url(url: &Url) -> String {
  let mut result = String::new();
  result.push_str(&url[..Position::BeforePath]);

  let path = url.path();
  if path != "/" {
    result.push_str(path);
  }

  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }

  if let Some(fragment) = url.fragment() {
    result.push('#');
    result.push_str(fragment);
  }

  result
}

/// Parse a URL by prefixing it with the https:// scheme.
fn parse_with_https_prefix(input: &str) -> Result<Url> {
  let with_scheme = format!("https://{input}");
  Url::parse(&with_scheme).map_err(|_| anyhow::anyhow!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Also repairs
/// malformed schemes like "http:/example.com" (missing slash).
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  for scheme in ["http", "https"] {
    let prefix = format!("{scheme}:");
    let proper = format!("{scheme}://");
    if lowered.starts_with(&prefix) && !lowered.starts_with(&proper) {
      let remainder = trimmed.split_once(':').map(|(_, rest)| rest).unwrap_or("");
      return parse_with_https_prefix(remainder.trim_start_matches('/')).map(|url| normalize_url(&url));
    }
  }

  let url = match Url::parse(trimmed) {
    // A single-letter "scheme" is almost always a Windows drive or a typo,
    // and schemeless "host:port" parses with the host as scheme.
    Ok(url) if url.scheme().len() > 1 && url.host().is_some() => url,
    _ => parse_with_https_prefix(trimmed)?,
  };

  Ok(normalize_url(&url))
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use backlog_test_utils::EnvVarGuard;

  use super::*;

  // The resolve tests mutate JIRA_HOST, which is process-global state
  static ENV_LOCK: Mutex<()> = Mutex::new(());

  #[test]
  fn test_ensure_url_scheme_with_https() {
    let result = ensure_url_scheme("https://company.atlassian.net").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_ensure_url_scheme_with_http() {
    let result = ensure_url_scheme("http://jira.example.com").unwrap();
    assert_eq!(result, "http://jira.example.com");
  }

  #[test]
  fn test_ensure_url_scheme_without_scheme() {
    let result = ensure_url_scheme("company.atlassian.net").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_ensure_url_scheme_empty_string() {
    let result = ensure_url_scheme("");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Host cannot be empty"));
  }

  #[test]
  fn test_ensure_url_scheme_whitespace_only() {
    let result = ensure_url_scheme("   ");
    assert!(result.is_err());
  }

  #[test]
  fn test_ensure_url_scheme_with_port() {
    let result = ensure_url_scheme("localhost:8080").unwrap();
    assert_eq!(result, "https://localhost:8080");
  }

  #[test]
  fn test_ensure_url_scheme_with_http_and_port() {
    let result = ensure_url_scheme("http://localhost:8080").unwrap();
    assert_eq!(result, "http://localhost:8080");
  }

  #[test]
  fn test_ensure_url_scheme_ip_address() {
    let result = ensure_url_scheme("192.168.1.100").unwrap();
    assert_eq!(result, "https://192.168.1.100");
  }

  #[test]
  fn test_ensure_url_scheme_with_path() {
    let result = ensure_url_scheme("example.com/jira").unwrap();
    assert_eq!(result, "https://example.com/jira");
  }

  #[test]
  fn test_ensure_url_scheme_trailing_slash_dropped() {
    let result = ensure_url_scheme("https://company.atlassian.net/").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_ensure_url_scheme_case_insensitive_scheme() {
    let result = ensure_url_scheme("HTTPS://example.com").unwrap();
    assert_eq!(result, "https://example.com");
  }

  #[test]
  fn test_ensure_url_scheme_partial_scheme_http() {
    let result = ensure_url_scheme("http:/example.com").unwrap();
    assert_eq!(result, "https://example.com");
  }

  #[test]
  fn test_ensure_url_scheme_partial_scheme_https() {
    let result = ensure_url_scheme("https:/example.com").unwrap();
    assert_eq!(result, "https://example.com");
  }

  #[test]
  fn test_resolve_jira_base_url_with_env_var() {
    let _lock = ENV_LOCK.lock().unwrap();
    let guard = EnvVarGuard::new(ENV_JIRA_HOST);
    guard.set("company.atlassian.net");

    let result = resolve_jira_base_url().unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_resolve_jira_base_url_with_scheme_in_env() {
    let _lock = ENV_LOCK.lock().unwrap();
    let guard = EnvVarGuard::new(ENV_JIRA_HOST);
    guard.set("https://company.atlassian.net");

    let result = resolve_jira_base_url().unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_resolve_jira_base_url_missing_env_var() {
    let _lock = ENV_LOCK.lock().unwrap();
    let guard = EnvVarGuard::new(ENV_JIRA_HOST);
    guard.remove();

    let result = resolve_jira_base_url();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains(ENV_JIRA_HOST));
  }
}
