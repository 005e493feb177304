use crate::cli::run::{execute_run, print_report};
use crossprune_lib::{parse_schedule, CrossPruneError, Result, Scheduler, Settings};
use std::sync::atomic::Ordering;

pub fn handle_schedule_command(settings: &Settings, json: bool) -> Result<()> {
    let expr = settings.schedule.as_deref().ok_or_else(|| {
        CrossPruneError::Config("No schedule configured (set SCHEDULE or `schedule`)".to_string())
    })?;

    let scheduler = Scheduler::new(parse_schedule(expr)?);
    log::info!("Schedule: {}", expr);

    let shutdown = scheduler.shutdown_flag();
    ctrlc::set_handler(move || {
        log::info!("Received termination signal, stopping after the current run...");
        shutdown.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CrossPruneError::Config(format!("Failed to install signal handler: {}", e)))?;

    log::info!("Cron scheduler started. Waiting for next run...");
    scheduler.run(settings.run_on_start, || {
        if let Err(e) = execute_run(settings, json).and_then(|report| print_report(&report, json)) {
            log::error!("Run failed: {}", e);
        }
    });

    Ok(())
}
