//! Helpers for reading and writing credentials stored in `.netrc` files.
//!
//! Parsing and serialization live in one place so the CLI and the service
//! client discover credentials consistently.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Parses a `.netrc` file and returns credentials for the requested machine.
///
/// The parser supports both single-line (`machine host login user password
/// pass`) and multi-line formats. If the target machine is not present or has
/// missing `login`/`password` values, `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let file = File::open(path).context("Failed to open .netrc file")?;
  let reader = BufReader::new(file);

  let mut current_machine = String::new();
  let mut username = String::new();
  let mut password = String::new();

  for line in reader.lines() {
    let line = line.context("Failed to read line from .netrc")?;
    let parts: Vec<&str> = line.split_whitespace().collect();

    for i in 0..parts.len() {
      match parts[i] {
        "machine" if i + 1 < parts.len() => {
          // If we collected complete credentials for the previous machine,
          // check whether it was our target before moving on
          if !current_machine.is_empty() && !username.is_empty() && !password.is_empty() {
            if current_machine == target_machine {
              return Ok(Some(Credentials { username, password }));
            }
            username = String::new();
            password = String::new();
          }
          current_machine = parts[i + 1].to_string();
        }
        "login" if i + 1 < parts.len() => {
          username = parts[i + 1].to_string();
        }
        "password" if i + 1 < parts.len() => {
          password = parts[i + 1].to_string();
        }
        _ => {}
      }
    }
  }

  // Check the last machine in the file
  if current_machine == target_machine && !username.is_empty() && !password.is_empty() {
    return Ok(Some(Credentials { username, password }));
  }

  Ok(None)
}

/// Writes or updates a `.netrc` entry for the given machine.
///
/// Existing entries for the machine are replaced; otherwise a new entry is
/// appended. On Unix the file permissions are tightened to `600` so the
/// stored token is not world-readable.
///
/// # Errors
///
/// Returns an error if the file cannot be read from or written to, or if
/// permissions cannot be set.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let mut existing_content = String::new();
  let mut machine_exists = false;

  if path.exists() {
    existing_content = std::fs::read_to_string(path).context("Failed to read existing .netrc file")?;
    machine_exists = existing_content.contains(&format!("machine {machine}"));
  }

  if machine_exists {
    // Update existing entry
    let lines: Vec<&str> = existing_content.lines().collect();
    let mut new_content = String::new();
    let mut skip_until_next_machine = false;

    for line in lines {
      let trimmed = line.trim();

      if trimmed.starts_with("machine ") {
        if trimmed == format!("machine {machine}") {
          skip_until_next_machine = true;
          new_content.push_str(&format!("machine {machine}\n"));
          new_content.push_str(&format!("  login {username}\n"));
          new_content.push_str(&format!("  password {password}\n"));
        } else {
          skip_until_next_machine = false;
          new_content.push_str(line);
          new_content.push('\n');
        }
      } else if !skip_until_next_machine {
        new_content.push_str(line);
        new_content.push('\n');
      }
    }

    std::fs::write(path, new_content).context("Failed to write updated .netrc file")?;
  } else {
    // Append new entry
    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .context("Failed to open .netrc file for writing")?;

    // Add a newline if file exists and doesn't end with one
    if path.metadata()?.len() > 0 && !existing_content.ends_with('\n') {
      writeln!(file)?;
    }

    writeln!(file, "machine {machine}")?;
    writeln!(file, "  login {username}")?;
    writeln!(file, "  password {password}")?;
  }

  set_secure_permissions(path)?;

  Ok(())
}

#[cfg(unix)]
fn set_secure_permissions(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let mut perms = std::fs::metadata(path)
    .context("Failed to read .netrc metadata")?
    .permissions();
  perms.set_mode(0o600);
  std::fs::set_permissions(path, perms).context("Failed to set .netrc permissions")
}

#[cfg(not(unix))]
fn set_secure_permissions(_path: &Path) -> Result<()> {
  Ok(())
}

/// Normalizes a Jira host URL by removing protocol prefixes and trailing
/// slashes, yielding the bare machine name used in `.netrc` entries.
pub fn normalize_host(raw_host: &str) -> String {
  raw_host
    .trim_start_matches("https://")
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_string()
}
