//! Shared utility functions for K2s crates

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Get the user's home directory
///
/// Prefers the HOME / USERPROFILE environment variables over dirs::home_dir()
/// so that scripts and CLI agree on the location.
pub fn get_home_dir() -> Result<PathBuf> {
    for var in ["HOME", "USERPROFILE"] {
        if let Ok(home) = std::env::var(var) {
            if !home.is_empty() {
                return Ok(PathBuf::from(home));
            }
        }
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) => rest,
        None => return Ok(PathBuf::from(path)),
    };

    let rest = rest.trim_start_matches(['/', '\\']);
    let home = get_home_dir()?;

    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Read a file, mapping NotFound to [`Error::ConfigNotFound`]
pub(crate) fn read_config_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })
}
