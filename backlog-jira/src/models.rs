use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// Represents a Jira issue
#[derive(Debug, Deserialize)]
pub struct Issue {
  #[allow(dead_code)]
  pub id: String,
  pub key: String,
  pub fields: IssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Deserialize)]
pub struct IssueFields {
  pub summary: String,
  pub description: Option<String>,
  pub status: IssueStatus,
  #[serde(default)]
  pub assignee: Option<User>,
  #[serde(default, rename = "issuelinks")]
  pub issue_links: Vec<IssueLink>,
}

/// Represents a Jira issue status
#[derive(Debug, Deserialize)]
pub struct IssueStatus {
  #[allow(dead_code)]
  pub id: Option<String>,
  pub name: String,
}

/// Represents a Jira user
#[derive(Debug, Deserialize)]
pub struct User {
  #[serde(default, rename = "accountId")]
  pub account_id: Option<String>,
  #[serde(rename = "displayName")]
  pub display_name: String,
}

/// One entry in an issue's `issuelinks` field
///
/// Exactly one of `inward_issue`/`outward_issue` is populated depending on
/// which side of the link the fetched issue sits on.
#[derive(Debug, Deserialize)]
pub struct IssueLink {
  pub id: String,
  #[serde(default, rename = "inwardIssue")]
  pub inward_issue: Option<LinkedIssue>,
  #[serde(default, rename = "outwardIssue")]
  pub outward_issue: Option<LinkedIssue>,
}

/// The far end of an issue link
#[derive(Debug, Deserialize)]
pub struct LinkedIssue {
  pub key: String,
}

/// Represents a link type installed on the Jira instance
#[derive(Debug, Deserialize)]
pub struct IssueLinkType {
  pub id: String,
  pub name: String,
  pub inward: String,
  pub outward: String,
}

/// Represents a workflow transition
#[derive(Debug, Deserialize)]
pub struct Transition {
  pub id: String,
  pub name: String,
}

/// Represents a list of workflow transitions
#[derive(Debug, Deserialize)]
pub struct Transitions {
  pub transitions: Vec<Transition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

/// Request body for PUT /issue/{key}/assignee
///
/// `name: null` asks the server for the project default assignee, so the
/// field is always emitted.
#[derive(Debug, Serialize)]
pub struct AssignRequest {
  pub name: Option<String>,
}

/// Request body for POST /issueLink
#[derive(Debug, Serialize)]
pub struct LinkRequest {
  #[serde(rename = "inwardIssue")]
  pub inward_issue: IssueRef,
  #[serde(rename = "outwardIssue")]
  pub outward_issue: IssueRef,
  #[serde(rename = "type")]
  pub link_type: LinkTypeRef,
}

/// An issue referenced by key in a request payload
#[derive(Debug, Serialize)]
pub struct IssueRef {
  pub key: String,
}

/// A link type referenced by name in a request payload
#[derive(Debug, Serialize)]
pub struct LinkTypeRef {
  pub name: String,
}

/// Request body for POST /issue/{key}/comment
#[derive(Debug, Serialize)]
pub struct CommentRequest {
  pub body: String,
}

/// Request body for POST /issue/{key}/worklog
#[derive(Debug, Serialize)]
pub struct WorklogRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub started: Option<String>,
  #[serde(rename = "timeSpent")]
  pub time_spent: String,
  pub comment: String,
}

/// Jira's standard error body: a top-level message list plus a per-field
/// error map. Both fields are optional in practice.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
  #[serde(default, rename = "errorMessages")]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
}

impl ApiErrorBody {
  /// Whether the body carried any usable detail
  pub fn is_empty(&self) -> bool {
    self.error_messages.is_empty() && self.errors.is_empty()
  }
}
