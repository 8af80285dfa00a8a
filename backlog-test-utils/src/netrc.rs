use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tempfile::TempDir;

/// Get the path to the .netrc file
fn get_netrc_path() -> PathBuf {
  let base_dirs = BaseDirs::new().expect("Could not determine base directories");
  let home = base_dirs.home_dir();
  home.join(".netrc")
}

/// RAII guard for test .netrc files
///
/// This struct creates a temporary .netrc file with the given content, sets
/// the HOME environment variable to point to the temporary directory, and
/// restores the original HOME environment variable when dropped.
pub struct NetrcGuard {
  #[allow(dead_code)]
  temp_dir: TempDir,
  netrc_path: PathBuf,
  original_home: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    // Save original home path
    let original_home = get_netrc_path().parent().expect("netrc path has a parent").to_path_buf();

    // Create temporary directory and .netrc file
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    let mut file = fs::File::create(&netrc_path).expect("Failed to create test .netrc");
    file.write_all(content.as_bytes()).expect("Failed to write test .netrc");

    // Set HOME environment variable to the temporary directory
    unsafe {
      std::env::set_var("HOME", temp_dir.path());
    }

    Self {
      temp_dir,
      netrc_path,
      original_home,
    }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}

impl Drop for NetrcGuard {
  fn drop(&mut self) {
    // Restore original HOME environment variable
    unsafe {
      std::env::set_var("HOME", &self.original_home);
    }
  }
}
