// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine where Claude Code keeps its configuration for each install mode,
//! and where the statusline script and settings file should land inside of
//! it.
//!
//! # Configuration Layout
//!
//! Claude Code reads configuration from a `.claude` directory. The global
//! one lives in the user's home directory, and applies to every project. A
//! project may carry its own `.claude` directory at its root, which only
//! applies to that project. Both layouts look the same:
//!
//! ```text
//! .claude/
//! ├── settings.json
//! └── statusline.sh
//! ```

use std::{
    env,
    fs::create_dir_all,
    io,
    path::{Component, Path, PathBuf},
};

/// Name of Claude Code's configuration directory.
pub const CLAUDE_DIR: &str = ".claude";

/// File name of the installed statusline script.
pub const SCRIPT_NAME: &str = "statusline.sh";

/// File name of Claude Code's settings document.
pub const SETTINGS_NAME: &str = "settings.json";

/// Determine absolute path to user's home directory.
///
/// Consults `HOME` first, then `USERPROFILE`, skipping empty values. Falls
/// back to the platform lookup of [`dirs::home_dir`] when neither variable is
/// usable. Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(env::var_os)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or(NoWayHome)
}

/// Lexically normalize a path.
///
/// Drops `.` components and lets `..` consume the component before it. The
/// file system is never consulted, so symbolic links are not resolved.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if normal.file_name().is_some() => {
                normal.pop();
            }
            // INVARIANT: Cannot climb above the root.
            Component::ParentDir if normal.has_root() => {}
            other => normal.push(other),
        }
    }

    normal
}

/// Create parent directory of target path along with any missing ancestors.
pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
