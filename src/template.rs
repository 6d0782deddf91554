// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Statusline script templates.
//!
//! The statusline script ships inside of the binary itself, so a regular
//! install never depends on files lying around next to the executable. Users
//! that maintain their own script can point the installer at it instead.
//! Either way, the script content is copied verbatim.

use std::{
    fs::read,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Statusline script bundled with the installer.
pub const BUNDLED_SCRIPT: &str = include_str!("../templates/statusline.sh");

/// Where to take the statusline script from.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub enum TemplateSource {
    /// Script embedded into the binary.
    #[default]
    Bundled,

    /// Custom script on the file system.
    File(PathBuf),
}

impl TemplateSource {
    /// Construct source from optional custom script path.
    pub fn new(path: Option<impl Into<PathBuf>>) -> Self {
        match path {
            Some(path) => Self::File(path.into()),
            None => Self::Bundled,
        }
    }

    /// Load raw script content.
    ///
    /// # Errors
    ///
    /// - Return [`TemplateError::NotFound`] if custom script does not exist.
    /// - Return [`TemplateError::Read`] if custom script cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bundled => Ok(BUNDLED_SCRIPT.as_bytes().to_vec()),
            Self::File(path) => load_file(path),
        }
    }
}

fn load_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(TemplateError::NotFound { path: path.into() });
    }

    debug!("load statusline template from {}", path.display());
    read(path).map_err(|err| TemplateError::Read {
        source: err,
        path: path.into(),
    })
}

/// Template error types.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template does not exist.
    #[error("could not find statusline template at {path:?}")]
    NotFound { path: PathBuf },

    /// Template exists, but cannot be read.
    #[error("failed to read statusline template at {path:?}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
type Result<T, E = TemplateError> = std::result::Result<T, E>;
