pub mod config;
pub mod run;
pub mod schedule;

use clap::{Parser, Subcommand};
use crossprune_lib::{Result, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossprune")]
#[command(about = "Find torrents kept alive only by cross-seeding hardlinks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, conflicts_with = "apply", help = "Report only, never tag torrents")]
    pub dry_run: bool,

    #[arg(long, global = true, help = "Tag reclaimable torrents (overrides DRY_RUN)")]
    pub apply: bool,

    #[arg(long, global = true, help = "Tag to apply to reclaimable torrents")]
    pub label: Option<String>,

    #[arg(long, global = true, help = "Print the report as JSON")]
    pub json: bool,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run once and exit, ignoring any schedule")]
    Run,

    #[command(about = "Run on the configured cron schedule until interrupted")]
    Schedule,

    #[command(about = "Show the effective configuration")]
    Config,
}

/// Settings from file and environment, with command-line flags on top.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if cli.dry_run {
        settings.dry_run = true;
    }
    if cli.apply {
        settings.dry_run = false;
    }
    if let Some(label) = &cli.label {
        settings.label = label.clone();
    }

    settings.validate()?;
    Ok(settings)
}
