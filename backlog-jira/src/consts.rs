//! Constants for the backlog-jira client.

/// Accept header value for Jira API requests
pub const ACCEPT: &str = "application/json";

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("backlog/", env!("CARGO_PKG_VERSION"));

/// Assignee sentinel that unassigns the issue
pub const ASSIGNEE_NONE: &str = "none";

/// Assignee sentinel that falls back to the project default assignee
pub const ASSIGNEE_DEFAULT: &str = "default";
