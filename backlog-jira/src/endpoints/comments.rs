//! # Comment Endpoint
//!
//! Adding comments to an issue.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use tracing::instrument;

use crate::client::JiraClient;
use crate::consts::{ACCEPT, USER_AGENT};
use crate::models::CommentRequest;

impl JiraClient {
  /// Add a comment to an issue using the
  /// POST /rest/api/2/issue/{key}/comment endpoint
  #[instrument(skip(self, body), level = "debug")]
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issue/{}/comment", self.base_url, issue_key);

    let payload = CommentRequest { body: body.to_string() };

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
      .context("Failed to add comment to Jira issue")?;

    match response.status() {
      StatusCode::CREATED => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
