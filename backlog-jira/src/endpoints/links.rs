//! # Issue Link Endpoints
//!
//! Connecting and disconnecting issues: listing the instance's link types,
//! creating a link, resolving the link id between two issues, and deleting a
//! link by id.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use tracing::instrument;

use crate::client::JiraClient;
use crate::consts::{ACCEPT, USER_AGENT};
use crate::models::{IssueLinkType, IssueRef, LinkRequest, LinkTypeRef};

/// Response envelope for GET /rest/api/2/issueLinkType
#[derive(Debug, Deserialize)]
struct IssueLinkTypes {
  #[serde(rename = "issueLinkTypes")]
  issue_link_types: Vec<IssueLinkType>,
}

impl JiraClient {
  /// List the link types installed on the instance using the
  /// GET /rest/api/2/issueLinkType endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue_link_types(&self) -> Result<Vec<IssueLinkType>> {
    let url = format!("{}/rest/api/2/issueLinkType", self.base_url);

    let response = self
      .client
      .get(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch issue link types")?;

    match response.status() {
      StatusCode::OK => {
        let out = response
          .json::<IssueLinkTypes>()
          .await
          .context("Failed to parse issue link types")?;
        Ok(out.issue_link_types)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Connect two issues with the given link type using the
  /// POST /rest/api/2/issueLink endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn link_issues(&self, inward_issue: &str, outward_issue: &str, link_type: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issueLink", self.base_url);

    let payload = LinkRequest {
      inward_issue: IssueRef {
        key: inward_issue.to_string(),
      },
      outward_issue: IssueRef {
        key: outward_issue.to_string(),
      },
      link_type: LinkTypeRef {
        name: link_type.to_string(),
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
      .context("Failed to link Jira issues")?;

    match response.status() {
      StatusCode::CREATED => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!(
        "One of {} and {} was not found",
        inward_issue,
        outward_issue
      )),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Find the link id connecting two issues.
  ///
  /// Scans the inward issue's `issuelinks` field; either direction counts.
  pub async fn get_link_id(&self, inward_issue: &str, outward_issue: &str) -> Result<String> {
    let issue = self.get_issue(inward_issue).await?;

    for link in &issue.fields.issue_links {
      if let Some(inward) = &link.inward_issue
        && inward.key == outward_issue
      {
        return Ok(link.id.clone());
      }
      if let Some(outward) = &link.outward_issue
        && outward.key == outward_issue
      {
        return Ok(link.id.clone());
      }
    }

    Err(anyhow::anyhow!(
      "No link found between {inward_issue} and {outward_issue}"
    ))
  }

  /// Disconnect two issues using the DELETE /rest/api/2/issueLink/{id}
  /// endpoint
  #[instrument(skip(self), level = "debug")]
  pub async fn unlink_issues(&self, link_id: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issueLink/{}", self.base_url, link_id);

    let response = self
      .client
      .delete(&url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to unlink Jira issues")?;

    match response.status() {
      StatusCode::NO_CONTENT => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Jira credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue link {} not found", link_id)),
      status => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        status,
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
