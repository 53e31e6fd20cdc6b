//! Centralized path resolution for skincheck
//!
//! Every file the bot touches is resolved through this module so the binary
//! behaves the same regardless of the working directory it is started from.
//!
//! ## Directory Structure
//!
//! ```text
//! <data_local_dir>/skincheck/
//! ├── data/
//! │ ├── config.toml
//! │ ├── exclusive.txt
//! │ └── most_wanted.txt
//! └── logs/
//!   └── skincheck_<date>.log
//! ```

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "skincheck";

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

/// Platform data directory, falling back to the home directory and finally
/// the working directory.
fn resolve_base_directory() -> PathBuf {
  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Config file and operator-maintained reference lists live here
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// Resolves a configured path: absolute paths are kept, relative ones are
/// anchored at the data directory.
pub fn resolve_data_path(configured: &str) -> PathBuf {
  resolve_against(&get_data_directory(), configured)
}

pub fn resolve_against(base: &Path, configured: &str) -> PathBuf {
  let path = Path::new(configured);
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  }
}

/// Creates the base, data and logs directories if missing
///
/// Must run before `logger::init()` because file logging needs the logs
/// directory.
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = [
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;

      eprintln!("Created directory: {}", dir.display());
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_relative_paths_anchor_at_base() {
    let base = Path::new("/srv/skincheck/data");
    assert_eq!(
      resolve_against(base, "exclusive.txt"),
      PathBuf::from("/srv/skincheck/data/exclusive.txt")
    );
  }

  #[test]
  fn test_absolute_paths_are_kept() {
    let base = Path::new("/srv/skincheck/data");
    assert_eq!(
      resolve_against(base, "/etc/skincheck/most_wanted.txt"),
      PathBuf::from("/etc/skincheck/most_wanted.txt")
    );
  }

  #[test]
  fn test_config_lives_in_data_directory() {
    assert!(get_config_path().starts_with(get_data_directory()));
    assert!(get_data_directory().starts_with(get_base_directory()));
  }
}
