//! # Issue Ranking
//!
//! The agile backlog keeps issues in a total order, and the
//! `PUT /rest/agile/1.0/issue/rank` endpoint moves one or more issues
//! relative to an anchor issue (or to the top of the backlog). The endpoint
//! answers with a three-way status contract: 204 when every issue was
//! ranked, 207 when the operation failed for some of them, and ordinary
//! error codes otherwise.
//!
//! Rank instructions are validated here, before any network call, and the
//! response contract is interpreted by a pure function so every branch can
//! be exercised without a server.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::client::JiraClient;
use crate::consts::{ACCEPT, USER_AGENT};
use crate::models::ApiErrorBody;

/// Where ranked issues land relative to the rest of the backlog.
///
/// The wire format expresses `Before`/`After` as `rankBeforeIssue`/
/// `rankAfterIssue`; `First` is expressed by omitting both keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankReference {
  /// Place the issues immediately before the given issue
  Before(String),
  /// Place the issues immediately after the given issue
  After(String),
  /// Move the issues to the top of the backlog
  First,
}

/// Rank instructions rejected before any network call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
  #[error("no issues provided to rank")]
  NoIssues,
  #[error("issue key cannot be empty")]
  BlankIssueKey,
  #[error("duplicate issue key: '{0}'")]
  DuplicateIssueKey(String),
  #[error("either a before or after reference issue must be specified, or rank first")]
  MissingReference,
  #[error("only one of before, after, or first may be specified")]
  ConflictingReference,
  #[error("reference issue key cannot be empty")]
  BlankReference,
}

/// A validated rank instruction.
///
/// Constructed per invocation via [`RankRequest::build`], consumed by a
/// single [`JiraClient::rank_issues`] call, and discarded. Exactly one
/// reference mode is set by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRequest {
  issues: Vec<String>,
  reference: RankReference,
}

impl RankRequest {
  /// Validate raw rank flags and convert them into a request.
  ///
  /// `before` and `after` are mutually exclusive, and `first` conflicts with
  /// both; exactly one of the three must be chosen. Issue keys must be
  /// non-empty and unique.
  pub fn build(issues: Vec<String>, before: Option<&str>, after: Option<&str>, first: bool) -> Result<Self, RankError> {
    if issues.is_empty() {
      return Err(RankError::NoIssues);
    }
    for (i, key) in issues.iter().enumerate() {
      if key.trim().is_empty() {
        return Err(RankError::BlankIssueKey);
      }
      if issues[..i].contains(key) {
        return Err(RankError::DuplicateIssueKey(key.clone()));
      }
    }

    let reference = match (before, after, first) {
      (Some(_), Some(_), _) | (Some(_), None, true) | (None, Some(_), true) => {
        return Err(RankError::ConflictingReference);
      }
      (None, None, false) => return Err(RankError::MissingReference),
      (None, None, true) => RankReference::First,
      (Some(key), None, false) => RankReference::Before(validate_reference(key)?),
      (None, Some(key), false) => RankReference::After(validate_reference(key)?),
    };

    Ok(Self { issues, reference })
  }

  /// The issues being moved, in the order they will be inserted
  pub fn issues(&self) -> &[String] {
    &self.issues
  }

  /// The anchor the issues are positioned against
  pub const fn reference(&self) -> &RankReference {
    &self.reference
  }

  /// Wire payload for the rank endpoint
  pub(crate) fn payload(&self) -> RankPayload<'_> {
    let (rank_before_issue, rank_after_issue) = match &self.reference {
      RankReference::Before(key) => (Some(key.as_str()), None),
      RankReference::After(key) => (None, Some(key.as_str())),
      RankReference::First => (None, None),
    };
    RankPayload {
      issues: &self.issues,
      rank_before_issue,
      rank_after_issue,
    }
  }
}

fn validate_reference(key: &str) -> Result<String, RankError> {
  let key = key.trim();
  if key.is_empty() {
    return Err(RankError::BlankReference);
  }
  Ok(key.to_string())
}

/// Request body for PUT /rest/agile/1.0/issue/rank.
///
/// At most one positional key is present; an unset key is omitted rather
/// than sent as an empty string.
#[derive(Debug, Serialize)]
pub(crate) struct RankPayload<'a> {
  issues: &'a [String],
  #[serde(rename = "rankBeforeIssue", skip_serializing_if = "Option::is_none")]
  rank_before_issue: Option<&'a str>,
  #[serde(rename = "rankAfterIssue", skip_serializing_if = "Option::is_none")]
  rank_after_issue: Option<&'a str>,
}

/// Outcome of a dispatched rank call.
///
/// A partial or full failure is reported upward as data instead of being
/// retried here: a rank mutation that partially applied has already moved
/// some issues, and blindly re-issuing it can scramble the backlog order
/// further. Resubmission is the operator's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankOutcome {
  /// 204: every issue was ranked
  Success,
  /// 207: the operation failed for some issues; carries the raw status line
  /// as an opaque diagnostic
  PartialFailure(String),
  /// The transport yielded neither a response nor an error
  EmptyResponse,
  /// Any other status; the message embeds the status line and whatever
  /// detail the error body offered
  UnexpectedResponse(String),
}

impl RankOutcome {
  /// Whether every issue was ranked
  pub const fn is_success(&self) -> bool {
    matches!(self, Self::Success)
  }
}

/// Map the rank endpoint's status contract onto an outcome.
///
/// `None` means the transport produced neither a response nor an error.
/// That case is kept apart from the unexpected-response branch so it can
/// never be mistaken for a 200 with an empty body.
fn interpret_rank_response(response: Option<(StatusCode, String)>) -> RankOutcome {
  let Some((status, body)) = response else {
    return RankOutcome::EmptyResponse;
  };

  match status {
    StatusCode::NO_CONTENT => RankOutcome::Success,
    StatusCode::MULTI_STATUS => RankOutcome::PartialFailure(status_line(status)),
    _ => RankOutcome::UnexpectedResponse(unexpected_response_message(status, &body)),
  }
}

/// Render a status code as "204 No Content"
fn status_line(status: StatusCode) -> String {
  match status.canonical_reason() {
    Some(reason) => format!("{} {}", status.as_u16(), reason),
    None => status.as_u16().to_string(),
  }
}

/// Build a failure message from the status line and the error body.
///
/// Jira's `{errorMessages, errors}` shape is folded into the message when it
/// parses; an empty or unparseable body falls back to the status line alone.
fn unexpected_response_message(status: StatusCode, body: &str) -> String {
  let line = status_line(status);

  if body.trim().is_empty() {
    return format!("unexpected response from Jira: {line} with empty body");
  }

  match serde_json::from_str::<ApiErrorBody>(body) {
    Ok(parsed) if !parsed.is_empty() => {
      let mut details = parsed.error_messages;
      details.extend(parsed.errors.into_iter().map(|(field, message)| format!("{field}: {message}")));
      format!("unexpected response from Jira: {line} - {}", details.join("; "))
    }
    _ => format!("unexpected response from Jira: {line}"),
  }
}

impl JiraClient {
  /// Change the rank of one or more issues using the
  /// PUT /rest/agile/1.0/issue/rank endpoint.
  ///
  /// Returns the interpreted [`RankOutcome`]; transport failures (connect,
  /// TLS, timeout) propagate as errors. This method never retries: a 207
  /// answer means some issues already moved, and the caller decides whether
  /// resubmitting is safe.
  #[instrument(skip(self, request), level = "debug")]
  pub async fn rank_issues(&self, request: &RankRequest) -> Result<RankOutcome> {
    let url = format!("{}/rest/agile/1.0/issue/rank", self.base_url);

    debug!("Ranking {} issue(s) {:?}", request.issues().len(), request.reference());

    let response = self
      .client
      .put(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::CONTENT_TYPE, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&request.payload())
      .send()
      .await
      .context("Failed to call the issue rank API")?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let outcome = interpret_rank_response(Some((status, body)));
    if let RankOutcome::PartialFailure(status_text) = &outcome {
      warn!("Rank operation returned multi-status: {status_text}");
    }
    Ok(outcome)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{basic_auth, body_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::create_jira_client;

  fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
  }

  // Build validation

  #[test]
  fn test_build_with_after() {
    let request = RankRequest::build(keys(&["TEST-1"]), None, Some("TEST-2"), false).unwrap();
    assert_eq!(request.issues(), ["TEST-1".to_string()]);
    assert_eq!(*request.reference(), RankReference::After("TEST-2".to_string()));
  }

  #[test]
  fn test_build_with_before() {
    let request = RankRequest::build(keys(&["TEST-1", "TEST-3"]), Some("TEST-4"), None, false).unwrap();
    assert_eq!(*request.reference(), RankReference::Before("TEST-4".to_string()));
  }

  #[test]
  fn test_build_with_first() {
    let request = RankRequest::build(keys(&["TEST-1"]), None, None, true).unwrap();
    assert_eq!(*request.reference(), RankReference::First);
  }

  #[test]
  fn test_build_trims_reference_key() {
    let request = RankRequest::build(keys(&["TEST-1"]), None, Some("  TEST-2 "), false).unwrap();
    assert_eq!(*request.reference(), RankReference::After("TEST-2".to_string()));
  }

  #[test]
  fn test_build_rejects_empty_issues() {
    let result = RankRequest::build(vec![], None, Some("TEST-2"), false);
    assert_eq!(result.unwrap_err(), RankError::NoIssues);
  }

  #[test]
  fn test_build_rejects_blank_issue_key() {
    let result = RankRequest::build(keys(&["TEST-1", "  "]), None, Some("TEST-2"), false);
    assert_eq!(result.unwrap_err(), RankError::BlankIssueKey);
  }

  #[test]
  fn test_build_rejects_duplicate_issue_key() {
    let result = RankRequest::build(keys(&["TEST-1", "TEST-2", "TEST-1"]), None, Some("TEST-3"), false);
    assert_eq!(result.unwrap_err(), RankError::DuplicateIssueKey("TEST-1".to_string()));
  }

  #[test]
  fn test_build_rejects_missing_reference() {
    let result = RankRequest::build(keys(&["TEST-1"]), None, None, false);
    assert_eq!(result.unwrap_err(), RankError::MissingReference);
  }

  #[test]
  fn test_build_rejects_before_and_after() {
    let result = RankRequest::build(keys(&["TEST-1"]), Some("TEST-2"), Some("TEST-3"), false);
    assert_eq!(result.unwrap_err(), RankError::ConflictingReference);
  }

  #[test]
  fn test_build_rejects_first_combined_with_anchor() {
    let result = RankRequest::build(keys(&["TEST-1"]), Some("TEST-2"), None, true);
    assert_eq!(result.unwrap_err(), RankError::ConflictingReference);

    let result = RankRequest::build(keys(&["TEST-1"]), None, Some("TEST-2"), true);
    assert_eq!(result.unwrap_err(), RankError::ConflictingReference);
  }

  #[test]
  fn test_build_rejects_blank_reference() {
    let result = RankRequest::build(keys(&["TEST-1"]), Some("   "), None, false);
    assert_eq!(result.unwrap_err(), RankError::BlankReference);
  }

  // Payload shape

  #[test]
  fn test_payload_after_emits_only_rank_after_issue() {
    let request = RankRequest::build(keys(&["TEST-1"]), None, Some("TEST-2"), false).unwrap();
    let json = serde_json::to_value(request.payload()).unwrap();

    assert_eq!(json, json!({ "issues": ["TEST-1"], "rankAfterIssue": "TEST-2" }));
  }

  #[test]
  fn test_payload_before_emits_only_rank_before_issue() {
    let request = RankRequest::build(keys(&["TEST-1", "TEST-3"]), Some("TEST-4"), None, false).unwrap();
    let json = serde_json::to_value(request.payload()).unwrap();

    assert_eq!(
      json,
      json!({ "issues": ["TEST-1", "TEST-3"], "rankBeforeIssue": "TEST-4" })
    );
  }

  #[test]
  fn test_payload_first_emits_issues_only() {
    let request = RankRequest::build(keys(&["TEST-1"]), None, None, true).unwrap();
    let json = serde_json::to_value(request.payload()).unwrap();

    assert_eq!(json, json!({ "issues": ["TEST-1"] }));
  }

  // Response interpretation

  #[test]
  fn test_interpret_204_is_success() {
    let outcome = interpret_rank_response(Some((StatusCode::NO_CONTENT, String::new())));
    assert_eq!(outcome, RankOutcome::Success);
  }

  #[test]
  fn test_interpret_204_ignores_body() {
    let outcome = interpret_rank_response(Some((StatusCode::NO_CONTENT, "unexpected noise".to_string())));
    assert_eq!(outcome, RankOutcome::Success);
  }

  #[test]
  fn test_interpret_207_is_partial_failure_with_status_text() {
    let outcome = interpret_rank_response(Some((StatusCode::MULTI_STATUS, String::new())));
    match outcome {
      RankOutcome::PartialFailure(status_text) => assert!(status_text.contains("207 Multi-Status")),
      other => panic!("expected partial failure, got {other:?}"),
    }
  }

  #[test]
  fn test_interpret_400_embeds_parsed_error_body() {
    let body = r#"{"errorMessages":["Request failed"],"errors":{"field":"Some issue with a field"}}"#;
    let outcome = interpret_rank_response(Some((StatusCode::BAD_REQUEST, body.to_string())));
    match outcome {
      RankOutcome::UnexpectedResponse(message) => {
        assert!(message.contains("400 Bad Request"));
        assert!(message.contains("Request failed"));
        assert!(message.contains("Some issue with a field"));
      }
      other => panic!("expected unexpected response, got {other:?}"),
    }
  }

  #[test]
  fn test_interpret_200_with_empty_body() {
    let outcome = interpret_rank_response(Some((StatusCode::OK, String::new())));
    match outcome {
      RankOutcome::UnexpectedResponse(message) => assert!(message.contains("200 OK with empty body")),
      other => panic!("expected unexpected response, got {other:?}"),
    }
  }

  #[test]
  fn test_interpret_unparseable_body_falls_back_to_status_line() {
    let outcome = interpret_rank_response(Some((StatusCode::BAD_GATEWAY, "<html>gateway</html>".to_string())));
    match outcome {
      RankOutcome::UnexpectedResponse(message) => {
        assert!(message.contains("502 Bad Gateway"));
        assert!(!message.contains("gateway</html>"));
      }
      other => panic!("expected unexpected response, got {other:?}"),
    }
  }

  #[test]
  fn test_interpret_absent_response_is_empty_response() {
    let outcome = interpret_rank_response(None);
    assert_eq!(outcome, RankOutcome::EmptyResponse);
    // Not the same failure as a 200 with an empty body
    assert_ne!(outcome, interpret_rank_response(Some((StatusCode::OK, String::new()))));
  }

  // Dispatch against a mock server

  #[tokio::test]
  async fn test_rank_issues_success() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("PUT"))
      .and(path("/rest/agile/1.0/issue/rank"))
      .and(basic_auth("test_user", "test_token"))
      .and(header("content-type", "application/json"))
      .and(body_json(json!({ "issues": ["TEST-1"], "rankAfterIssue": "TEST-2" })))
      .respond_with(ResponseTemplate::new(204))
      .mount(&mock_server)
      .await;

    let request = RankRequest::build(keys(&["TEST-1"]), None, Some("TEST-2"), false)?;
    let outcome = client.rank_issues(&request).await?;

    assert!(outcome.is_success());
    Ok(())
  }

  #[tokio::test]
  async fn test_rank_issues_multi_status() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("PUT"))
      .and(path("/rest/agile/1.0/issue/rank"))
      .respond_with(ResponseTemplate::new(207).set_body_json(json!({
          "entries": [{ "issues": ["TEST-9"], "errors": ["Issue does not exist"], "status": 404 }]
      })))
      .mount(&mock_server)
      .await;

    let request = RankRequest::build(keys(&["TEST-1", "TEST-9"]), Some("TEST-3"), None, false)?;
    let outcome = client.rank_issues(&request).await?;

    match outcome {
      RankOutcome::PartialFailure(status_text) => assert!(status_text.contains("207 Multi-Status")),
      other => panic!("expected partial failure, got {other:?}"),
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_rank_issues_bad_request() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("PUT"))
      .and(path("/rest/agile/1.0/issue/rank"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
          "errorMessages": ["Request failed"],
          "errors": { "field": "Some issue with a field" }
      })))
      .mount(&mock_server)
      .await;

    let request = RankRequest::build(keys(&["TEST-1"]), None, Some("TEST-2"), false)?;
    let outcome = client.rank_issues(&request).await?;

    match outcome {
      RankOutcome::UnexpectedResponse(message) => {
        assert!(message.contains("400 Bad Request"));
        assert!(message.contains("Request failed"));
        assert!(message.contains("Some issue with a field"));
      }
      other => panic!("expected unexpected response, got {other:?}"),
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_rank_issues_rank_first_sends_no_anchor_keys() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("PUT"))
      .and(path("/rest/agile/1.0/issue/rank"))
      .and(body_json(json!({ "issues": ["TEST-5", "TEST-6"] })))
      .respond_with(ResponseTemplate::new(204))
      .mount(&mock_server)
      .await;

    let request = RankRequest::build(keys(&["TEST-5", "TEST-6"]), None, None, true)?;
    let outcome = client.rank_issues(&request).await?;

    assert_eq!(outcome, RankOutcome::Success);
    Ok(())
  }
}
