//! # Jira API Client
//!
//! Provides Jira REST API integration for issue management: retrieval,
//! assignment, linking, commenting, worklog recording, workflow transitions,
//! and backlog ranking. Requests are authenticated with basic auth and the
//! response contracts of each endpoint are mapped onto typed outcomes.

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
pub mod models;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
// Re-export the rank endpoint surface
pub use endpoints::rank::{RankError, RankOutcome, RankReference, RankRequest};
// Re-export models
pub use models::{Issue, IssueFields, IssueLinkType, IssueStatus, JiraAuth, Transition, User};
