// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Install a statusline script for Claude Code.
//!
//! Copies the statusline script into a project's `.claude` directory, or the
//! user's `~/.claude` directory, and points Claude Code's `settings.json` at
//! it through the `statusLine` setting.
//!
//! # See Also
//!
//! 1. [Claude Code - Status line configuration](https://docs.anthropic.com/en/docs/claude-code/statusline)

pub mod install;
pub mod path;
pub mod settings;
pub mod template;

pub use install::{
    AssumeYes, Confirm, InquirePrompter, InstallError, InstallMode, InstallOptions,
    InstallOutcome, InstallReport, Installer,
};
pub use settings::{SettingsDocument, StatusLine};
pub use template::TemplateSource;
