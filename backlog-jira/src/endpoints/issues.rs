//! # Issue Endpoints
//!
//! Jira API endpoint implementations for fetching and assigning issues.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use tracing::{debug, instrument};

use crate::client::JiraClient;
use crate::consts::{ACCEPT, ASSIGNEE_DEFAULT, ASSIGNEE_NONE, USER_AGENT};
use crate::models::{AssignRequest, Issue};

impl JiraClient {
  /// Get a Jira issue by key using the GET /rest/api/2/issue/{key} endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .client
      .get(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch Jira issue")?;

    let status = response.status();
    debug!("Jira API response status: {}", status);

    match status {
      StatusCode::OK => {
        let issue = response.json::<Issue>().await.context("Failed to parse Jira issue")?;
        Ok(issue)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Assign an issue using the PUT /rest/api/2/issue/{key}/assignee endpoint.
  ///
  /// The assignee `none` unassigns the issue and `default` hands it to the
  /// project default assignee; anything else is sent as the account name.
  #[instrument(skip(self), level = "debug")]
  pub async fn assign_issue(&self, issue_key: &str, assignee: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issue/{}/assignee", self.base_url, issue_key);

    let name = match assignee {
      ASSIGNEE_NONE => Some("-1".to_string()),
      ASSIGNEE_DEFAULT => None,
      other => Some(other.to_string()),
    };

    let response = self
      .client
      .put(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::CONTENT_TYPE, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&AssignRequest { name })
      .send()
      .await
      .context("Failed to assign Jira issue")?;

    match response.status() {
      StatusCode::NO_CONTENT => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!("Invalid assignee '{}' for issue {}", assignee, issue_key)),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
