//! # Jira API Endpoints
//!
//! Organized endpoint implementations for the Jira resource types the tool
//! touches: issues, links, comments, worklogs, transitions, and backlog
//! ranking.

pub mod comments;
pub mod issues;
pub mod links;
pub mod rank;
pub mod transitions;
pub mod worklog;
