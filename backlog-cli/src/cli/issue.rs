//! # Issue Commands
//!
//! Derive-based implementation of the issue subcommands: viewing,
//! assignment, linking, commenting, worklog recording, transitions, and
//! backlog ranking.

#![allow(clippy::print_stdout)]

use anyhow::{Context, Result};
use backlog_core::issue_key::IssueKeyParser;
use backlog_core::output::{format_issue_key, format_status, print_info, print_success, print_warning};
use backlog_jira::auth::{create_jira_runtime_and_client, get_jira_host};
use backlog_jira::consts::{ASSIGNEE_DEFAULT, ASSIGNEE_NONE};
use backlog_jira::{JiraClient, RankOutcome, RankRequest};
use clap::{Args, Subcommand};
use directories::BaseDirs;
use owo_colors::OwoColorize;
use tokio::runtime::Runtime;

/// Command for issue operations
#[derive(Args)]
pub struct IssueArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: IssueSubcommands,
}

/// Subcommands for the issue command
#[derive(Subcommand)]
pub enum IssueSubcommands {
  /// View an issue
  #[command(long_about = "View details of a Jira issue.\n\n\
                   This command displays information about a specific issue,\n\
                   including its key, summary, status, assignee, and description.")]
  View {
    /// The issue key (e.g., PROJ-123, proj123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Assign an issue to a user
  #[command(long_about = "Assign a Jira issue to a user.\n\n\
                   The assignee 'none' unassigns the issue and 'default' hands it\n\
                   to the project default assignee.")]
  Assign {
    /// The issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The assignee account name, or 'none', or 'default'
    #[arg(required = true, index = 2)]
    assignee: String,
  },

  /// Add a comment to an issue
  Comment {
    /// The issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The comment text
    #[arg(required = true, short = 'm', long = "message")]
    message: String,
  },

  /// Record time spent on an issue
  #[command(long_about = "Record a worklog entry on a Jira issue.\n\n\
                   Durations use Jira's shorthand (e.g. 30m, 2h, 1d). Without --started\n\
                   the server uses its current datetime as the start date.")]
  Worklog {
    /// The issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Time spent (e.g. 30m, 2h, 1d)
    #[arg(required = true, index = 2)]
    time_spent: String,

    /// Worklog comment
    #[arg(short = 'm', long = "message", default_value = "")]
    message: String,

    /// Start datetime in Jira's format (e.g. 2025-10-02T09:00:00.000+0000)
    #[arg(long)]
    started: Option<String>,

    /// Replace the remaining estimate (e.g. 1d)
    #[arg(long = "new-estimate")]
    new_estimate: Option<String>,
  },

  /// Link two issues
  Link {
    /// The inward issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    inward_issue: String,

    /// The outward issue key (e.g., PROJ-124)
    #[arg(required = true, index = 2)]
    outward_issue: String,

    /// The link type name (e.g., Blocks); see `backlog issue link-types`
    #[arg(required = true, index = 3)]
    link_type: String,
  },

  /// Remove the link between two issues
  Unlink {
    /// The inward issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    inward_issue: String,

    /// The outward issue key (e.g., PROJ-124)
    #[arg(required = true, index = 2)]
    outward_issue: String,
  },

  /// List the link types installed on the Jira instance
  LinkTypes,

  /// Transition an issue through its workflow
  #[command(long_about = "Transition a Jira issue to a different status.\n\n\
                   If no transition is specified, available transitions are listed.")]
  Transition {
    /// The issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The transition name or ID (if not provided, available transitions will be listed)
    #[arg(index = 2)]
    transition: Option<String>,
  },

  /// Re-rank issues within the backlog
  #[command(long_about = "Rank one or more issues relative to another issue, or move them to\n\
                   the top of the backlog.\n\n\
                   Exactly one of --before, --after, or --first must be given. Ranking\n\
                   is a single remote mutation: if Jira reports a partial failure (some\n\
                   issues moved, some did not), nothing is retried automatically —\n\
                   verify the backlog order before resubmitting.\n\n\
                   Examples:\n  \
                   backlog issue rank PROJ-1 --after PROJ-2\n  \
                   backlog issue rank PROJ-1,PROJ-3 --before PROJ-4\n  \
                   backlog issue rank PROJ-9 --first")]
  Rank {
    /// The issue key(s) to move, comma-separated (e.g., PROJ-1,PROJ-3)
    #[arg(required = true, index = 1)]
    issues: String,

    /// Reference issue key to rank the issue(s) before
    #[arg(long, conflicts_with_all = ["after", "first"])]
    before: Option<String>,

    /// Reference issue key to rank the issue(s) after
    #[arg(long, conflicts_with_all = ["before", "first"])]
    after: Option<String>,

    /// Move the issue(s) to the top of the backlog
    #[arg(long, conflicts_with_all = ["before", "after"])]
    first: bool,
  },
}

/// Handle the issue command
pub fn handle_issue_command(issue: IssueArgs) -> Result<()> {
  let parser = IssueKeyParser::new_flexible();

  match issue.subcommand {
    IssueSubcommands::View { issue_key } => {
      let key = parser.parse(&issue_key)?;
      handle_view_command(&key)
    }
    IssueSubcommands::Assign { issue_key, assignee } => {
      let key = parser.parse(&issue_key)?;
      handle_assign_command(&key, &assignee)
    }
    IssueSubcommands::Comment { issue_key, message } => {
      let key = parser.parse(&issue_key)?;
      handle_comment_command(&key, &message)
    }
    IssueSubcommands::Worklog {
      issue_key,
      time_spent,
      message,
      started,
      new_estimate,
    } => {
      let key = parser.parse(&issue_key)?;
      handle_worklog_command(&key, started.as_deref(), &time_spent, &message, new_estimate.as_deref())
    }
    IssueSubcommands::Link {
      inward_issue,
      outward_issue,
      link_type,
    } => {
      let inward = parser.parse(&inward_issue)?;
      let outward = parser.parse(&outward_issue)?;
      handle_link_command(&inward, &outward, &link_type)
    }
    IssueSubcommands::Unlink {
      inward_issue,
      outward_issue,
    } => {
      let inward = parser.parse(&inward_issue)?;
      let outward = parser.parse(&outward_issue)?;
      handle_unlink_command(&inward, &outward)
    }
    IssueSubcommands::LinkTypes => handle_link_types_command(),
    IssueSubcommands::Transition { issue_key, transition } => {
      let key = parser.parse(&issue_key)?;
      handle_transition_command(&key, transition.as_deref())
    }
    IssueSubcommands::Rank {
      issues,
      before,
      after,
      first,
    } => {
      // Normalize every key up front so validation failures happen before
      // any network call
      let keys = issues
        .split(',')
        .map(|key| parser.parse(key))
        .collect::<Result<Vec<_>, _>>()?;
      let before = before.as_deref().map(|key| parser.parse(key)).transpose()?;
      let after = after.as_deref().map(|key| parser.parse(key)).transpose()?;

      handle_rank_command(keys, before.as_deref(), after.as_deref(), first)
    }
  }
}

/// Create the async runtime and an authenticated client for the configured
/// Jira host
fn jira_context() -> Result<(Runtime, JiraClient, String)> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let jira_host = get_jira_host()?;
  let (rt, client) = create_jira_runtime_and_client(base_dirs.home_dir(), &jira_host)?;
  Ok((rt, client, jira_host))
}

/// Handle the view command
fn handle_view_command(issue_key: &str) -> Result<()> {
  let (rt, client, jira_host) = jira_context()?;

  rt.block_on(async {
    let issue = client.get_issue(issue_key).await?;

    println!("\n  {} {}", "•".blue(), format!("Key:      {}", format_issue_key(&issue.key)).bold());
    println!("  {} {}", "•".blue(), format!("Summary:  {}", issue.fields.summary).bold());
    println!(
      "  {} {}",
      "•".blue(),
      format!("Status:   {}", format_status(&issue.fields.status.name)).bold()
    );
    match &issue.fields.assignee {
      Some(assignee) => println!("  {} Assignee: {}", "•".blue(), assignee.display_name),
      None => println!("  {} Assignee: {}", "•".blue(), "Unassigned".dimmed()),
    }

    if let Some(description) = &issue.fields.description
      && !description.is_empty()
    {
      println!();
      for line in description.lines() {
        println!("  {line}");
      }
    }

    println!("\n  {}/browse/{}\n", jira_host, issue.key);
    Ok(())
  })
}

/// Handle the assign command
fn handle_assign_command(issue_key: &str, assignee: &str) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    client.assign_issue(issue_key, assignee).await?;
    match assignee {
      ASSIGNEE_NONE => print_success(&format!("Unassigned issue {}", format_issue_key(issue_key))),
      ASSIGNEE_DEFAULT => print_success(&format!(
        "Assigned issue {} to the project default assignee",
        format_issue_key(issue_key)
      )),
      other => print_success(&format!("Assigned issue {} to {other}", format_issue_key(issue_key))),
    }
    Ok(())
  })
}

/// Handle the comment command
fn handle_comment_command(issue_key: &str, message: &str) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    client.add_comment(issue_key, message).await?;
    print_success(&format!("Added comment to issue {}", format_issue_key(issue_key)));
    Ok(())
  })
}

/// Handle the worklog command
fn handle_worklog_command(
  issue_key: &str,
  started: Option<&str>,
  time_spent: &str,
  message: &str,
  new_estimate: Option<&str>,
) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    client
      .add_worklog(issue_key, started, time_spent, message, new_estimate)
      .await?;
    print_success(&format!(
      "Logged {time_spent} on issue {}",
      format_issue_key(issue_key)
    ));
    Ok(())
  })
}

/// Handle the link command
fn handle_link_command(inward_issue: &str, outward_issue: &str, link_type: &str) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    client.link_issues(inward_issue, outward_issue, link_type).await?;
    print_success(&format!(
      "Linked {} to {} as '{link_type}'",
      format_issue_key(inward_issue),
      format_issue_key(outward_issue)
    ));
    Ok(())
  })
}

/// Handle the unlink command
fn handle_unlink_command(inward_issue: &str, outward_issue: &str) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    let link_id = client.get_link_id(inward_issue, outward_issue).await?;
    client.unlink_issues(&link_id).await?;
    print_success(&format!(
      "Removed the link between {} and {}",
      format_issue_key(inward_issue),
      format_issue_key(outward_issue)
    ));
    Ok(())
  })
}

/// Handle the link-types command
fn handle_link_types_command() -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    let types = client.get_issue_link_types().await?;
    if types.is_empty() {
      print_info("No link types installed on this Jira instance.");
      return Ok(());
    }

    print_info("Available link types:");
    for link_type in types {
      println!("  • {} (inward: '{}', outward: '{}')", link_type.name, link_type.inward, link_type.outward);
    }
    Ok(())
  })
}

/// Handle the transition command
fn handle_transition_command(issue_key: &str, transition: Option<&str>) -> Result<()> {
  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    let transitions = client.get_transitions(issue_key).await?;

    // Without an argument, list what is available
    let Some(transition_name) = transition else {
      if transitions.is_empty() {
        print_info("No transitions available for this issue.");
      } else {
        print_info(&format!("Available transitions for issue {issue_key}:"));
        for t in transitions {
          println!("  • {} (ID: {})", t.name, t.id);
        }
      }
      return Ok(());
    };

    // Find the transition ID by name (case-insensitive) or by ID
    let transition_id = transitions
      .iter()
      .find(|t| t.name.eq_ignore_ascii_case(transition_name) || t.id == transition_name)
      .map(|t| t.id.clone());

    match transition_id {
      Some(id) => {
        client.transition_issue(issue_key, &id).await?;
        print_success(&format!(
          "Transitioned issue {} to '{transition_name}'",
          format_issue_key(issue_key)
        ));
        Ok(())
      }
      None => {
        print_info("Available transitions:");
        for t in transitions {
          println!("  • {} (ID: {})", t.name, t.id);
        }
        Err(anyhow::anyhow!(
          "Transition '{transition_name}' not found for issue {issue_key}"
        ))
      }
    }
  })
}

/// Handle the rank command.
///
/// A partial failure (Jira's 207) is surfaced verbatim and exits non-zero;
/// the command never resubmits on its own because some issues may already
/// have moved.
fn handle_rank_command(issues: Vec<String>, before: Option<&str>, after: Option<&str>, first: bool) -> Result<()> {
  // Validation happens before the client is even constructed
  let request = RankRequest::build(issues, before, after, first)?;

  let (rt, client, _) = jira_context()?;

  rt.block_on(async {
    let count = request.issues().len();
    match client.rank_issues(&request).await? {
      RankOutcome::Success => {
        print_success(&format!(
          "Ranked {count} issue(s): {}",
          describe_reference(before, after, first)
        ));
        Ok(())
      }
      RankOutcome::PartialFailure(status_text) => {
        print_warning(&format!(
          "Jira answered '{status_text}': some issues may not have been ranked."
        ));
        print_warning("Verify the backlog order before resubmitting; nothing was retried.");
        Err(anyhow::anyhow!("rank operation partially failed ({status_text})"))
      }
      RankOutcome::EmptyResponse => Err(anyhow::anyhow!(
        "Jira returned an empty response for the rank operation"
      )),
      RankOutcome::UnexpectedResponse(message) => Err(anyhow::anyhow!(message)),
    }
  })
}

/// Human-readable rendering of the chosen reference anchor
fn describe_reference(before: Option<&str>, after: Option<&str>, first: bool) -> String {
  if first {
    return "moved to the top of the backlog".to_string();
  }
  match (before, after) {
    (Some(key), _) => format!("placed before {key}"),
    (_, Some(key)) => format!("placed after {key}"),
    // Unreachable after validation, but keep the arm total
    (None, None) => "re-ranked".to_string(),
  }
}
