// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use claude_statusline::{
    install::DEFAULT_OUTPUT, AssumeYes, Confirm, InquirePrompter, InstallMode, InstallOptions,
    InstallOutcome, Installer, TemplateSource,
};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// A minimal, vibrant statusline for Claude Code with context tracking, cost
/// monitoring, and token stats.
#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "claude-statusline [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Init(opts)) => run_init(opts),
            None => Ok(Cli::command().print_help()?),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Install the statusline to your Claude Code configuration.
    #[command(override_usage = "claude-statusline init [options]")]
    Init(InitOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InitOptions {
    /// Output path for statusline script.
    #[arg(short, long, value_name = "path", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Install to global Claude Code settings (~/.claude/).
    #[arg(long)]
    pub global: bool,

    /// Generate script only, skip settings.json update.
    #[arg(long)]
    pub no_install: bool,

    /// Install custom statusline script instead of the bundled one.
    #[arg(short, long, value_name = "path")]
    pub template: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

impl From<&InitOptions> for InstallOptions {
    fn from(opts: &InitOptions) -> Self {
        Self {
            output: opts.output.clone(),
            mode: InstallMode::new(opts.global),
            install_settings: !opts.no_install,
            template: TemplateSource::new(opts.template.clone()),
        }
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_init(opts: InitOptions) -> Result<()> {
    let options = InstallOptions::from(&opts);
    if opts.yes {
        install(AssumeYes, &options)
    } else {
        install(InquirePrompter, &options)
    }
}

fn install(prompter: impl Confirm, options: &InstallOptions) -> Result<()> {
    let mut installer = Installer::from_current_dir(prompter)?;
    match installer.run(options)? {
        InstallOutcome::Installed(report) => debug!("install report: {report:?}"),
        InstallOutcome::Cancelled => debug!("install cancelled by user"),
    }

    Ok(())
}
