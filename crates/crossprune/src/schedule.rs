//! Cron-driven repetition of a job on the calling thread.
//!
//! Runs never overlap: the next fire time is computed only after the previous
//! run has returned.

use crate::error::{CrossPruneError, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Parses a cron expression. Five-field expressions are read as crontab:
/// a seconds field is prepended and numeric weekdays (0-7, Sunday = 0 or 7)
/// are rewritten as day names.
pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    let schedule_error = |message: String| CrossPruneError::Schedule {
        expr: expr.to_string(),
        message,
    };

    let fields: Vec<&str> = expr.split_whitespace().collect();
    let normalized = if fields.len() == 5 {
        let weekdays = crontab_weekdays(fields[4]).map_err(schedule_error)?;
        format!("0 {} {}", fields[..4].join(" "), weekdays)
    } else {
        fields.join(" ")
    };

    Schedule::from_str(&normalized).map_err(|e| schedule_error(e.to_string()))
}

/// Expands the numeric parts of a crontab weekday field into day names.
/// Named parts, `*` and `?` pass through untouched.
fn crontab_weekdays(field: &str) -> std::result::Result<String, String> {
    let mut parts: Vec<String> = Vec::new();

    for part in field.split(',') {
        if part == "*" || part == "?" || part.chars().any(|c| c.is_ascii_alphabetic()) {
            parts.push(part.to_string());
            continue;
        }

        let (range, step) = match part.split_once('/') {
            Some((range, step)) => (range, Some(parse_weekday_number(step)?)),
            None => (part, None),
        };
        let step = match step {
            Some(0) => return Err(format!("Invalid weekday step in '{}'", part)),
            Some(step) => step as usize,
            None => 1,
        };

        let (start, end) = match range {
            "*" => (0, 6),
            _ => match range.split_once('-') {
                Some((start, end)) => (parse_weekday_number(start)?, parse_weekday_number(end)?),
                None => {
                    let day = parse_weekday_number(range)?;
                    // "n/step" runs to the end of the week
                    (day, if part.contains('/') { 6 } else { day })
                }
            },
        };
        if start > end || end > 7 {
            return Err(format!("Invalid weekday range '{}'", part));
        }

        for day in (start..=end).step_by(step) {
            let name = WEEKDAY_NAMES[(day % 7) as usize].to_string();
            if !parts.contains(&name) {
                parts.push(name);
            }
        }
    }

    Ok(parts.join(","))
}

fn parse_weekday_number(value: &str) -> std::result::Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid weekday '{}'", value))
}

pub struct Scheduler {
    schedule: Schedule,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl Scheduler {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            shutdown: Arc::new(AtomicBool::new(false)),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Setting this flag stops the loop before the next run.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn next_run(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    fn stopping(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Blocks until shutdown, calling `job` at every fire time (and once up
    /// front when `run_on_start` is set). A run in progress is never interrupted.
    pub fn run<F: FnMut()>(&self, run_on_start: bool, mut job: F) {
        if run_on_start && !self.stopping() {
            log::info!("RUN_ON_START=true: executing initial run...");
            job();
        }

        while !self.stopping() {
            let Some(next) = self.next_run(Utc::now()) else {
                log::warn!("Schedule has no upcoming fire times; stopping");
                break;
            };
            log::debug!("Next run at {}", next);

            if !self.sleep_until(next) {
                break;
            }

            log::info!("Scheduled run starting...");
            job();
            log::info!("Scheduled run complete.");
        }

        log::info!("Shutting down scheduler...");
    }

    /// Returns false if shutdown was requested while waiting.
    fn sleep_until(&self, deadline: DateTime<Utc>) -> bool {
        loop {
            if self.stopping() {
                return false;
            }
            let remaining = match (deadline - Utc::now()).to_std() {
                Ok(remaining) if !remaining.is_zero() => remaining,
                _ => return true,
            };
            std::thread::sleep(remaining.min(self.poll_interval));
        }
    }
}
