//! # Credential Management
//!
//! Discovery and storage of authentication credentials for the Jira host,
//! backed by the user's `.netrc` file.

pub mod netrc;

/// Represents credentials for a service
#[derive(Debug, Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}
