//! # Issue Key Parser
//!
//! Flexible parsing and normalization of Jira issue keys. The CLI accepts
//! whatever a human types (`proj-123`, `PROJ123`, `Proj-123`) and hands the
//! service client the canonical `PROJ-123` form.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Parsing mode for issue keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKeyMode {
  /// Only accepts the canonical PROJ-123 format
  Strict,
  /// Accepts PROJ-123, PROJ123, proj123, Proj-123, etc.
  Flexible,
}

/// Errors that can occur during issue key parsing
#[derive(Debug, Error)]
pub enum IssueKeyError {
  #[error("Invalid issue key: '{0}' does not match any supported pattern")]
  InvalidFormat(String),
}

static STRICT_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]+-\d+$").expect("Failed to compile strict issue key regex"));

static FLEXIBLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  vec![
    // PROJ-123, proj-123, Proj-123, etc. (with hyphen)
    Regex::new(r"^([A-Za-z][A-Za-z0-9]+)-(\d+)$").expect("Failed to compile flexible issue key regex with hyphen"),
    // PROJ123, proj123, Proj123, etc. (without hyphen)
    Regex::new(r"^([A-Za-z][A-Za-z]+)(\d+)$").expect("Failed to compile flexible issue key regex without hyphen"),
  ]
});

/// Issue key parser with configurable strictness
pub struct IssueKeyParser {
  mode: IssueKeyMode,
}

impl IssueKeyParser {
  /// Create a new parser with the given mode
  pub const fn new(mode: IssueKeyMode) -> Self {
    Self { mode }
  }

  /// Create a new parser in flexible mode
  pub const fn new_flexible() -> Self {
    Self::new(IssueKeyMode::Flexible)
  }

  /// Create a new parser in strict mode
  pub const fn new_strict() -> Self {
    Self::new(IssueKeyMode::Strict)
  }

  /// Parse an issue key from user input, returning the canonical form
  pub fn parse(&self, input: &str) -> Result<String, IssueKeyError> {
    let input = input.trim();

    if input.is_empty() {
      return Err(IssueKeyError::InvalidFormat(input.to_string()));
    }

    match self.mode {
      IssueKeyMode::Strict => self.parse_strict(input),
      IssueKeyMode::Flexible => self.parse_flexible(input),
    }
  }

  fn parse_strict(&self, input: &str) -> Result<String, IssueKeyError> {
    if STRICT_PATTERN.is_match(input) {
      Ok(input.to_string())
    } else {
      Err(IssueKeyError::InvalidFormat(input.to_string()))
    }
  }

  fn parse_flexible(&self, input: &str) -> Result<String, IssueKeyError> {
    for pattern in FLEXIBLE_PATTERNS.iter() {
      if let Some(captures) = pattern.captures(input) {
        let project = captures[1].to_uppercase();
        let number = &captures[2];
        return Ok(format!("{project}-{number}"));
      }
    }
    Err(IssueKeyError::InvalidFormat(input.to_string()))
  }
}

impl Default for IssueKeyParser {
  fn default() -> Self {
    Self::new_flexible()
  }
}
