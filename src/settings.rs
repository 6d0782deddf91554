// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Claude Code settings document.
//!
//! Claude Code keeps its configuration in a JSON object called
//! `settings.json`. The installer only owns one top-level key of that object,
//! `statusLine`, which tells Claude Code what command to run for rendering
//! its status line. Every other key belongs to the user or to other tools,
//! so the document is kept untyped and passed through untouched.
//!
//! Key order is preserved between load and save, which keeps diffs of the
//! settings file small.

use crate::path::ensure_parent_dir;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, warn};

/// Top-level key of the settings document owned by the installer.
pub const STATUS_LINE_KEY: &str = "statusLine";

/// Status line directive.
///
/// Always a `"command"` directive with zero padding.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct StatusLine {
    /// Kind of status line directive.
    #[serde(rename = "type")]
    pub kind: String,

    /// Shell command Claude Code runs to render the status line.
    pub command: String,

    /// Padding around rendered status line.
    pub padding: u32,
}

impl StatusLine {
    /// Construct new command directive.
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            kind: "command".into(),
            command: command.into(),
            padding: 0,
        }
    }
}

/// Settings document layout.
///
/// A JSON object mapping string keys to arbitrary JSON values.
#[derive(Default, Debug, PartialEq, Clone)]
pub struct SettingsDocument {
    entries: Map<String, Value>,
}

impl SettingsDocument {
    /// Construct new empty settings document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings document from target path.
    ///
    /// A missing file is treated as an empty document.
    ///
    /// # Errors
    ///
    /// - Return [`SettingsError::Read`] if the file exists but cannot be read.
    /// - Return [`SettingsError::Parse`] if the file is not a JSON object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings found at {}", path.display());
            return Ok(Self::default());
        }

        read_to_string(path)
            .map_err(|err| SettingsError::Read {
                source: err,
                path: path.into(),
            })?
            .parse()
    }

    /// Load settings document, recovering from unusable content.
    ///
    /// Same as [`SettingsDocument::load`], except that an unreadable or
    /// malformed file is reported as a warning and replaced by an empty
    /// document.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|error| {
            warn!("Could not parse existing settings.json, creating new one: {error}");
            Self::default()
        })
    }

    /// Write settings document to target path.
    ///
    /// Creates any missing parent directories, then overwrites the file with
    /// pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// - Return [`SettingsError::Serialize`] if document cannot be serialized.
    /// - Return [`SettingsError::CreateDir`] if parent directory cannot be
    ///   created.
    /// - Return [`SettingsError::Write`] if file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_pretty_json()?;

        ensure_parent_dir(path).map_err(|err| SettingsError::CreateDir {
            source: err,
            path: path.into(),
        })?;
        write(path, content.as_bytes()).map_err(|err| SettingsError::Write {
            source: err,
            path: path.into(),
        })?;

        Ok(())
    }

    /// Set status line directive, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - Return [`SettingsError::Serialize`] if directive cannot be
    ///   serialized.
    pub fn set_status_line(&mut self, status_line: &StatusLine) -> Result<()> {
        let value = serde_json::to_value(status_line).map_err(SettingsError::Serialize)?;
        self.entries.insert(STATUS_LINE_KEY.into(), value);
        Ok(())
    }

    /// Current status line directive, if any.
    ///
    /// Returns `None` when the key is absent or does not have the shape of
    /// a status line directive.
    pub fn status_line(&self) -> Option<StatusLine> {
        self.entries
            .get(STATUS_LINE_KEY)
            .and_then(|value| StatusLine::deserialize(value).ok())
    }

    /// Lookup raw value of top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Iterate over top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn to_pretty_json(&self) -> Result<String> {
        let mut content =
            serde_json::to_string_pretty(&self.entries).map_err(SettingsError::Serialize)?;
        content.push('\n');
        Ok(content)
    }
}

impl FromStr for SettingsDocument {
    type Err = SettingsError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let entries = serde_json::from_str(data).map_err(SettingsError::Parse)?;
        Ok(Self { entries })
    }
}

impl Display for SettingsDocument {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.to_pretty_json()?.as_str())
    }
}

/// Settings document error types.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Failed to read existing settings file.
    #[error("failed to read settings at {path:?}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Settings content is not a JSON object.
    #[error("settings are not a valid JSON object")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize settings.
    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),

    /// Failed to create directory holding settings file.
    #[error("failed to create directory for settings at {path:?}")]
    CreateDir {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to write settings file.
    #[error("failed to write settings at {path:?}")]
    Write {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl From<SettingsError> for FmtError {
    fn from(_: SettingsError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = SettingsError> = std::result::Result<T, E>;
