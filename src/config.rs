use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "timetracking";
const DATABASE_FILE: &str = "timetracking.db";

pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AppError::Config("could not determine the user data directory".into()))
}

/// An explicit path (flag or `TIMETRACKING_DB`) wins over the data directory.
pub fn database_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(get_data_dir()?.join(DATABASE_FILE)),
    }
}

pub fn create_parent_dir_if_not_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            debug!(dir = %parent.display(), "creating database directory");
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
