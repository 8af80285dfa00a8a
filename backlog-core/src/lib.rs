//! # Backlog Core Library
//!
//! Shared utilities for the backlog workspace: terminal output formatting,
//! Jira host resolution, credential discovery, and issue key parsing. The
//! service client and the CLI both build on this crate so they agree on how
//! hosts are normalized and how user-facing messages look.

pub mod creds;
pub mod issue_key;
pub mod output;
pub mod url;

// Re-export main types
pub use creds::Credentials;
pub use issue_key::{IssueKeyError, IssueKeyParser};
pub use output::{format_issue_key, print_error, print_info, print_success, print_warning};
pub use url::{ENV_JIRA_HOST, ensure_url_scheme, resolve_jira_base_url};
