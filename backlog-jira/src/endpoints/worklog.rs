//! # Worklog Endpoint
//!
//! Recording time spent on an issue.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use tracing::instrument;

use crate::client::JiraClient;
use crate::consts::{ACCEPT, USER_AGENT};
use crate::models::WorklogRequest;

impl JiraClient {
  /// Add a worklog entry to an issue using the
  /// POST /rest/api/2/issue/{key}/worklog endpoint.
  ///
  /// Leave `started` as `None` to use the server's current datetime as the
  /// start date. When `new_estimate` is set, the remaining estimate is
  /// replaced via `adjustEstimate=new`.
  #[instrument(skip(self, comment), level = "debug")]
  pub async fn add_worklog(
    &self,
    issue_key: &str,
    started: Option<&str>,
    time_spent: &str,
    comment: &str,
    new_estimate: Option<&str>,
  ) -> Result<()> {
    let mut url = format!("{}/rest/api/2/issue/{}/worklog", self.base_url, issue_key);
    if let Some(estimate) = new_estimate {
      url = format!("{url}?adjustEstimate=new&newEstimate={estimate}");
    }

    let payload = WorklogRequest {
      started: started.map(str::to_string),
      time_spent: time_spent.to_string(),
      comment: comment.to_string(),
    };

    let response = self
      .client
      .post(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::CONTENT_TYPE, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&payload)
      .send()
      .await
      .context("Failed to add worklog to Jira issue")?;

    match response.status() {
      StatusCode::CREATED => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid worklog for issue {}. Check the time format (e.g. 2h, 30m, 1d).",
        issue_key
      )),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
