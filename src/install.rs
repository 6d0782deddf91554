// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Statusline installation workflow.
//!
//! An install copies the statusline script into a `.claude` directory, and
//! points Claude Code's settings at it. There are two install modes:
//!
//! - __Project__ installs write the script to a path relative to the project
//!   directory, and patch `<project>/.claude/settings.json`.
//! - __Global__ installs always write to `~/.claude/statusline.sh`, and patch
//!   `~/.claude/settings.json`.
//!
//! # Install Steps
//!
//! 1. Resolve script and settings paths.
//! 2. Ask before overwriting an existing script.
//! 3. Ask before proceeding with the install.
//! 4. Load the statusline template.
//! 5. Write the script, and mark it executable.
//! 6. Merge the status line directive into the settings document.
//! 7. Check whether `jq` is available for the script to use.
//!
//! Every path is resolved and the template is loaded before anything gets
//! written. Nothing is rolled back when a later step fails, so a failed
//! settings merge leaves the freshly written script behind.
//!
//! The settings document always refers to the script through a path relative
//! to the project or home directory, never through the absolute path it was
//! written to. Thus, the settings file stays valid across machines and
//! checkouts.

use crate::{
    path::{
        ensure_parent_dir, home_dir, normalize, NoWayHome, CLAUDE_DIR, SCRIPT_NAME, SETTINGS_NAME,
    },
    settings::{SettingsDocument, SettingsError, StatusLine},
    template::{TemplateError, TemplateSource},
};

use inquire::InquireError;
use std::{
    env,
    fs::write,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Default output path of statusline script for project installs.
pub const DEFAULT_OUTPUT: &str = "./.claude/statusline.sh";

/// Where to install the statusline.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum InstallMode {
    /// Install into project's `.claude` directory.
    #[default]
    Project,

    /// Install into user's `~/.claude` directory.
    Global,
}

impl InstallMode {
    /// Select install mode from global flag.
    pub fn new(global: bool) -> Self {
        if global {
            Self::Global
        } else {
            Self::Project
        }
    }

    /// Human readable install location.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "project (./.claude/)",
            Self::Global => "global (~/.claude/)",
        }
    }

    /// Command that settings document uses to invoke installed script.
    pub fn script_command(&self) -> &'static str {
        match self {
            Self::Project => ".claude/statusline.sh",
            Self::Global => "~/.claude/statusline.sh",
        }
    }
}

/// Options for a single install run.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InstallOptions {
    /// Output path of script for project installs.
    ///
    /// Relative paths are resolved against the project directory. Ignored by
    /// global installs.
    pub output: PathBuf,

    /// Install mode.
    pub mode: InstallMode,

    /// Merge status line directive into settings document.
    pub install_settings: bool,

    /// Where to take the script from.
    pub template: TemplateSource,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.into(),
            mode: InstallMode::default(),
            install_settings: true,
            template: TemplateSource::default(),
        }
    }
}

/// Result of an install run that did not fail.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum InstallOutcome {
    /// Statusline was installed.
    Installed(InstallReport),

    /// User declined one of the confirmation prompts.
    Cancelled,
}

/// Summary of a completed install.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InstallReport {
    /// Where the script was written.
    pub script_path: PathBuf,

    /// Settings document that was updated, if any.
    pub settings_path: Option<PathBuf>,

    /// Whether `jq` was found on `PATH`.
    pub jq_available: bool,
}

/// Yes or no confirmation from the user.
pub trait Confirm {
    /// Ask the user a yes or no question.
    ///
    /// The `default` answer is used when the user simply hits enter.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, InquireError>;
}

impl<C> Confirm for &mut C
where
    C: Confirm + ?Sized,
{
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, InquireError> {
        (**self).confirm(message, default)
    }
}

/// Interactive confirmation through the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Confirm for InquirePrompter {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, InquireError> {
        inquire::Confirm::new(message).with_default(default).prompt()
    }
}

/// Non-interactive confirmation that accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool, InquireError> {
        info!("{message} yes");
        Ok(true)
    }
}

/// Statusline installer.
///
/// Bound to a project directory that project installs are relative to. The
/// home directory is looked up from the environment when a global install
/// needs it, unless one was given through [`Installer::with_home_dir`].
#[derive(Debug)]
pub struct Installer<C = InquirePrompter>
where
    C: Confirm,
{
    project_dir: PathBuf,
    home_dir: Option<PathBuf>,
    prompter: C,
}

impl<C> Installer<C>
where
    C: Confirm,
{
    /// Construct new installer for target project directory.
    pub fn new(project_dir: impl Into<PathBuf>, prompter: C) -> Self {
        Self {
            project_dir: project_dir.into(),
            home_dir: None,
            prompter,
        }
    }

    /// Construct new installer for current working directory.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::CurrentDir`] if current working directory
    ///   cannot be determined.
    pub fn from_current_dir(prompter: C) -> Result<Self> {
        let project_dir = env::current_dir().map_err(InstallError::CurrentDir)?;
        Ok(Self::new(project_dir, prompter))
    }

    /// Use target home directory instead of looking it up.
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    /// Resolve path that script will be written to.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::NoWayHome`] if global install cannot locate
    ///   home directory.
    pub fn script_path(&self, options: &InstallOptions) -> Result<PathBuf> {
        match options.mode {
            InstallMode::Global => Ok(self.claude_dir(options.mode)?.join(SCRIPT_NAME)),
            InstallMode::Project => Ok(normalize(self.project_dir.join(&options.output))),
        }
    }

    /// Resolve path of settings document for install mode.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::NoWayHome`] if global install cannot locate
    ///   home directory.
    pub fn settings_path(&self, mode: InstallMode) -> Result<PathBuf> {
        Ok(self.claude_dir(mode)?.join(SETTINGS_NAME))
    }

    /// Run the install.
    ///
    /// Declining a confirmation prompt is not an error, and yields
    /// [`InstallOutcome::Cancelled`] without touching the file system.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::NoWayHome`] if global install cannot locate
    ///   home directory.
    /// - Return [`InstallError::Prompt`] if user cannot be prompted.
    /// - Return [`InstallError::Template`] if template cannot be loaded.
    /// - Return [`InstallError::CreateDir`], [`InstallError::WriteScript`], or
    ///   [`InstallError::SetPermissions`] if script cannot be written.
    /// - Return [`InstallError::Settings`] if settings cannot be written.
    #[instrument(skip(self, options), level = "debug")]
    pub fn run(&mut self, options: &InstallOptions) -> Result<InstallOutcome> {
        info!("Claude Code Statusline Installer");

        // INVARIANT: Resolve every path before anything gets written.
        let script_path = self.script_path(options)?;
        let settings_path = if options.install_settings {
            Some(self.settings_path(options.mode)?)
        } else {
            None
        };
        debug!("resolved script path {script_path:?} and settings path {settings_path:?}");

        if script_path.exists() {
            let message = format!(
                "Statusline script already exists at {}. Overwrite?",
                script_path.display()
            );
            if !self.ask(&message, false)? {
                info!("Installation cancelled.");
                return Ok(InstallOutcome::Cancelled);
            }
        }

        info!("Installing to: {}", options.mode.label());
        info!("Script path: {}", script_path.display());
        if !self.ask("Proceed with installation?", true)? {
            info!("Installation cancelled.");
            return Ok(InstallOutcome::Cancelled);
        }

        let script = options.template.load()?;
        write_script(&script_path, &script)?;
        info!("Created statusline script: {}", script_path.display());

        if let Some(settings_path) = &settings_path {
            let mut settings = SettingsDocument::load_or_default(settings_path);
            settings.set_status_line(&StatusLine::command(options.mode.script_command()))?;
            settings.save(settings_path)?;
            info!("Updated settings: {}", settings_path.display());
        }

        info!("Installation complete!");
        info!("Restart Claude Code to see your new statusline.");

        let jq_available = jq_available();
        if !jq_available {
            info!("Note: 'jq' is not installed. Some features will be limited.");
            info!("Install jq for full functionality:");
            info!("  macOS: brew install jq");
            info!("  Linux: apt-get install jq / yum install jq");
        }

        Ok(InstallOutcome::Installed(InstallReport {
            script_path,
            settings_path,
            jq_available,
        }))
    }

    fn claude_dir(&self, mode: InstallMode) -> Result<PathBuf> {
        match mode {
            InstallMode::Global => Ok(self.home()?.join(CLAUDE_DIR)),
            InstallMode::Project => Ok(self.project_dir.join(CLAUDE_DIR)),
        }
    }

    fn home(&self) -> Result<PathBuf> {
        match &self.home_dir {
            Some(home_dir) => Ok(home_dir.clone()),
            None => Ok(home_dir()?),
        }
    }

    // Escaping or interrupting a prompt counts as declining it.
    fn ask(&mut self, message: &str, default: bool) -> Result<bool> {
        match self.prompter.confirm(message, default) {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(error) => Err(InstallError::Prompt(error)),
        }
    }
}

/// Check if `jq` can be found on `PATH`.
///
/// The bundled script leans on `jq` to pick apart the status payload that
/// Claude Code sends it. Only advisory, the installer itself never runs it.
pub fn jq_available() -> bool {
    match which::which("jq") {
        Ok(path) => {
            debug!("found jq at {}", path.display());
            true
        }
        Err(error) => {
            debug!("cannot find jq: {error}");
            false
        }
    }
}

fn write_script(path: &Path, script: &[u8]) -> Result<()> {
    ensure_parent_dir(path).map_err(|err| InstallError::CreateDir {
        source: err,
        path: path.into(),
    })?;
    write(path, script).map_err(|err| InstallError::WriteScript {
        source: err,
        path: path.into(),
    })?;
    set_executable(path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::{
        fs::{set_permissions, Permissions},
        os::unix::fs::PermissionsExt,
    };

    set_permissions(path, Permissions::from_mode(0o755)).map_err(|err| {
        InstallError::SetPermissions {
            source: err,
            path: path.into(),
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// All possible error types for statusline installation.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Home directory cannot be located.
    #[error(transparent)]
    NoWayHome(#[from] NoWayHome),

    /// Current working directory cannot be determined.
    #[error("cannot determine current working directory")]
    CurrentDir(#[source] std::io::Error),

    /// User cannot be prompted.
    #[error("failed to prompt for confirmation")]
    Prompt(#[source] InquireError),

    /// Template cannot be loaded.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Directory of script cannot be created.
    #[error("failed to create directory for statusline script at {path:?}")]
    CreateDir {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Script cannot be written.
    #[error("failed to write statusline script to {path:?}")]
    WriteScript {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Script cannot be made executable.
    #[error("failed to make statusline script at {path:?} executable")]
    SetPermissions {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Settings document cannot be updated.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Friendly result alias :3
type Result<T, E = InstallError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BUNDLED_SCRIPT;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use serde_json::json;
    use std::{
        collections::VecDeque,
        fs::{create_dir_all, read, read_to_string},
    };

    /// Answers prompts from a fixed script, falling back to the default.
    #[derive(Debug, Default)]
    struct ScriptedPrompter {
        answers: VecDeque<Result<bool, InquireError>>,
        asked: Vec<(String, bool)>,
    }

    impl ScriptedPrompter {
        fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: answers.into_iter().map(Ok).collect(),
                asked: Vec::new(),
            }
        }

        fn failing(error: InquireError) -> Self {
            Self {
                answers: VecDeque::from([Err(error)]),
                asked: Vec::new(),
            }
        }
    }

    impl Confirm for ScriptedPrompter {
        fn confirm(&mut self, message: &str, default: bool) -> Result<bool, InquireError> {
            self.asked.push((message.into(), default));
            self.answers.pop_front().unwrap_or(Ok(default))
        }
    }

    fn project_options(output: &str) -> InstallOptions {
        InstallOptions {
            output: output.into(),
            ..InstallOptions::default()
        }
    }

    fn global_options() -> InstallOptions {
        InstallOptions {
            mode: InstallMode::Global,
            ..InstallOptions::default()
        }
    }

    #[test]
    fn project_script_path_joins_output_onto_project_dir() -> anyhow::Result<()> {
        let installer = Installer::new("/work/project", AssumeYes);
        assert_eq!(
            installer.script_path(&project_options(DEFAULT_OUTPUT))?,
            PathBuf::from("/work/project/.claude/statusline.sh")
        );
        assert_eq!(
            installer.script_path(&project_options("scripts/../bin/status.sh"))?,
            PathBuf::from("/work/project/bin/status.sh")
        );
        assert_eq!(
            installer.script_path(&project_options("/tmp/x/statusline.sh"))?,
            PathBuf::from("/tmp/x/statusline.sh")
        );
        assert_eq!(
            installer.settings_path(InstallMode::Project)?,
            PathBuf::from("/work/project/.claude/settings.json")
        );
        Ok(())
    }

    #[test]
    fn global_paths_are_rooted_at_home_dir() -> anyhow::Result<()> {
        let installer = Installer::new("/work/project", AssumeYes).with_home_dir("/home/blah");
        let options = InstallOptions {
            output: "ignored/statusline.sh".into(),
            ..global_options()
        };
        assert_eq!(
            installer.script_path(&options)?,
            PathBuf::from("/home/blah/.claude/statusline.sh")
        );
        assert_eq!(
            installer.settings_path(InstallMode::Global)?,
            PathBuf::from("/home/blah/.claude/settings.json")
        );
        Ok(())
    }

    #[sealed_test(env = [("HOME", "/home/from-env")])]
    fn global_paths_fall_back_to_environment_home() -> anyhow::Result<()> {
        let installer = Installer::new("/work/project", AssumeYes);
        assert_eq!(
            installer.script_path(&global_options())?,
            PathBuf::from("/home/from-env/.claude/statusline.sh")
        );
        Ok(())
    }

    #[sealed_test]
    fn project_install_writes_script_and_settings() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let mut installer = Installer::new(&root, ScriptedPrompter::default());
        let outcome = installer.run(&InstallOptions::default())?;

        let script_path = root.join(".claude/statusline.sh");
        let settings_path = root.join(".claude/settings.json");
        match outcome {
            InstallOutcome::Installed(report) => {
                assert_eq!(report.script_path, script_path);
                assert_eq!(report.settings_path, Some(settings_path.clone()));
            }
            InstallOutcome::Cancelled => panic!("install should not be cancelled"),
        }

        assert_eq!(read(&script_path)?, BUNDLED_SCRIPT.as_bytes());
        let settings = SettingsDocument::load(&settings_path)?;
        assert_eq!(
            settings.status_line(),
            Some(StatusLine::command(".claude/statusline.sh"))
        );

        // No existing script, so only the proceed prompt is shown.
        assert_eq!(
            installer.prompter.asked,
            vec![("Proceed with installation?".to_string(), true)]
        );

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn script_is_executable() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = env::current_dir()?;
        let mut installer = Installer::new(&root, AssumeYes);
        installer.run(&project_options("x/statusline.sh"))?;

        let mode = std::fs::metadata(root.join("x/statusline.sh"))?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        Ok(())
    }

    #[sealed_test]
    fn settings_merge_keeps_foreign_keys() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        create_dir_all(root.join(".claude"))?;
        std::fs::write(root.join(".claude/settings.json"), r#"{"foo": 1}"#)?;

        let mut installer = Installer::new(&root, AssumeYes);
        installer.run(&InstallOptions::default())?;

        let settings = SettingsDocument::load(root.join(".claude/settings.json"))?;
        assert_eq!(settings.get("foo"), Some(&json!(1)));
        assert_eq!(
            settings.get("statusLine"),
            Some(&json!({ "type": "command", "command": ".claude/statusline.sh", "padding": 0 }))
        );

        Ok(())
    }

    #[sealed_test]
    fn malformed_settings_are_replaced() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        create_dir_all(root.join(".claude"))?;
        std::fs::write(root.join(".claude/settings.json"), "{ \"foo\": 1,, }")?;
        assert!(matches!(
            SettingsDocument::load(root.join(".claude/settings.json")),
            Err(SettingsError::Parse(_))
        ));

        let mut installer = Installer::new(&root, AssumeYes);
        installer.run(&InstallOptions::default())?;

        let settings = SettingsDocument::load(root.join(".claude/settings.json"))?;
        assert_eq!(settings.keys().collect::<Vec<_>>(), vec!["statusLine"]);

        Ok(())
    }

    #[sealed_test]
    fn declining_overwrite_keeps_existing_script() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        create_dir_all(root.join(".claude"))?;
        std::fs::write(root.join(".claude/statusline.sh"), "echo mine\n")?;

        let mut installer = Installer::new(&root, ScriptedPrompter::answering([false]));
        let outcome = installer.run(&InstallOptions::default())?;

        assert_eq!(outcome, InstallOutcome::Cancelled);
        assert_eq!(read_to_string(root.join(".claude/statusline.sh"))?, "echo mine\n");
        assert!(!root.join(".claude/settings.json").exists());

        let (message, default) = &installer.prompter.asked[0];
        assert!(message.ends_with("statusline.sh. Overwrite?"));
        assert!(!default);
        assert_eq!(installer.prompter.asked.len(), 1);

        Ok(())
    }

    #[sealed_test]
    fn declining_proceed_writes_nothing() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let mut installer = Installer::new(&root, ScriptedPrompter::answering([false]));
        let outcome = installer.run(&InstallOptions::default())?;

        assert_eq!(outcome, InstallOutcome::Cancelled);
        assert!(!root.join(".claude").exists());

        Ok(())
    }

    #[sealed_test]
    fn interrupted_prompt_cancels_install() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let prompter = ScriptedPrompter::failing(InquireError::OperationInterrupted);
        let mut installer = Installer::new(&root, prompter);

        assert_eq!(installer.run(&InstallOptions::default())?, InstallOutcome::Cancelled);
        assert!(!root.join(".claude").exists());

        Ok(())
    }

    #[sealed_test]
    fn prompt_failure_is_fatal() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let mut installer = Installer::new(&root, ScriptedPrompter::failing(InquireError::NotTTY));

        let result = installer.run(&InstallOptions::default());
        assert!(matches!(result, Err(InstallError::Prompt(InquireError::NotTTY))));

        Ok(())
    }

    #[sealed_test]
    fn missing_template_aborts_before_any_write() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let options = InstallOptions {
            output: "nested/dir/statusline.sh".into(),
            template: TemplateSource::File(root.join("missing.sh")),
            ..InstallOptions::default()
        };

        let mut installer = Installer::new(&root, AssumeYes);
        let result = installer.run(&options);

        assert!(matches!(
            result,
            Err(InstallError::Template(TemplateError::NotFound { .. }))
        ));
        assert!(!root.join("nested").exists());
        assert!(!root.join(".claude").exists());

        Ok(())
    }

    #[sealed_test]
    fn no_install_skips_settings() -> anyhow::Result<()> {
        let root = env::current_dir()?;
        let options = InstallOptions {
            install_settings: false,
            ..project_options("x/statusline.sh")
        };

        let mut installer = Installer::new(&root, AssumeYes);
        let outcome = installer.run(&options)?;

        assert!(matches!(
            outcome,
            InstallOutcome::Installed(InstallReport { settings_path: None, .. })
        ));
        assert!(root.join("x/statusline.sh").is_file());
        assert!(!root.join(".claude").exists());

        Ok(())
    }
}
