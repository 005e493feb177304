mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Commands;
use crossprune_lib::util::{init_logging, LogStream};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let settings = cli::load_settings(&cli).context("Failed to load settings")?;
    init_logging(
        cli.verbose,
        LogStream::for_output(cli.json),
        settings.log_file.as_deref(),
    )?;

    match cli.command {
        Some(Commands::Run) => cli::run::handle_run_command(&settings, cli.json)?,

        Some(Commands::Schedule) => cli::schedule::handle_schedule_command(&settings, cli.json)?,

        Some(Commands::Config) => cli::config::handle_config_command(&settings)?,

        None if settings.schedule.is_some() => {
            cli::schedule::handle_schedule_command(&settings, cli.json)?
        }

        None => cli::run::handle_run_command(&settings, cli.json)?,
    }

    Ok(())
}
