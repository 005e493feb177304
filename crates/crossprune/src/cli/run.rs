use chrono::Utc;
use console::{style, Term};
use crossprune_lib::{
    run_once, CollectOptions, FsResolver, LabelOutcome, LabelStatus, QbitClient, Result, RunReport,
    Settings,
};
use std::time::Instant;

pub fn handle_run_command(settings: &Settings, json: bool) -> Result<()> {
    log::info!("Running crossprune...");
    let started = Instant::now();

    let report = execute_run(settings, json)?;
    print_report(&report, json)?;

    log::info!(
        "Run finished in {}",
        crossprune_lib::util::format_duration(started.elapsed())
    );
    Ok(())
}

/// Connects, scans and classifies. Connection failures abort the run.
pub fn execute_run(settings: &Settings, json: bool) -> Result<RunReport> {
    let client = QbitClient::connect(settings)?;
    let options = CollectOptions {
        show_progress: !json && Term::stderr().is_term(),
    };
    run_once(&client, &FsResolver, settings, options, Utc::now())
}

pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print!("{}", report.summary.render());

    match &report.label_status {
        LabelStatus::NothingToLabel => {}
        LabelStatus::Done {
            outcome: LabelOutcome::Applied(n),
        } => println!(
            "\n{} Applied tag '{}' to {} torrents.",
            style("✓").green(),
            report.label,
            n
        ),
        LabelStatus::Done {
            outcome: LabelOutcome::DryRun(n),
        } => println!(
            "\n{} DRY RUN: no changes made. {} torrents would be tagged '{}'. Set DRY_RUN=false to apply tags.",
            style("!").yellow(),
            n,
            report.label
        ),
        LabelStatus::Failed { message } => {
            println!("\n{} {}", style("✗").red(), message)
        }
    }

    Ok(())
}
