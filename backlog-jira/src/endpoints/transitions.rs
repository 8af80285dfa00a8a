//! # Transition Endpoints
//!
//! Listing and performing workflow transitions on an issue.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use tracing::instrument;

use crate::client::JiraClient;
use crate::consts::{ACCEPT, USER_AGENT};
use crate::models::{Transition, TransitionId, TransitionRequest, Transitions};

impl JiraClient {
  /// Get available transitions for an issue using the
  /// GET /rest/api/2/issue/{key}/transitions endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
    let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);

    let response = self
      .client
      .get(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch Jira transitions")?;

    match response.status() {
      StatusCode::OK => {
        let transitions = response
          .json::<Transitions>()
          .await
          .context("Failed to parse Jira transitions")?;
        Ok(transitions.transitions)
      }
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

  /// Transition an issue to a new status using the
  /// POST /rest/api/2/issue/{key}/transitions endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);

    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
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
      .context("Failed to transition Jira issue")?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid transition. The transition may not be available for the current status."
      )),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
