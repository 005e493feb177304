use crate::classify::Classifier;
use crate::config::Settings;
use crate::error::Result;
use crate::index::{CollectOptions, Collector, IdentityResolver};
use crate::label::{apply_label, LabelOutcome};
use crate::report::Summary;
use crate::service::TorrentService;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelStatus {
    /// No reclaimable items.
    NothingToLabel,
    Done { outcome: LabelOutcome },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: Summary,
    pub label: String,
    pub label_status: LabelStatus,
}

/// One full pass: enumerate, scan every item, classify, then label the
/// reclaimable set. Only a failure to enumerate items aborts the run.
pub fn run_once(
    service: &dyn TorrentService,
    resolver: &dyn IdentityResolver,
    settings: &Settings,
    options: CollectOptions,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    match service.version() {
        Ok(version) => log::info!("Connected to qBittorrent {}", version),
        Err(e) => log::debug!("Could not read service version: {}", e),
    }

    let items = service.list_items()?;
    log::info!("Total torrents: {}", items.len());

    let inventory = Collector::new(service, resolver, options).collect(&items);

    let policy = settings.exclusion_policy();
    let partition =
        Classifier::new(&inventory, &policy, settings.partial_access).partition(&items, now);
    let summary = Summary::build(&partition, &inventory);

    let label_status = if summary.entries.is_empty() {
        LabelStatus::NothingToLabel
    } else {
        let hashes = summary.reclaimable_hashes();
        match apply_label(service, &hashes, &settings.label, settings.dry_run) {
            Ok(outcome) => {
                match outcome {
                    LabelOutcome::Applied(n) => {
                        log::info!("Applied tag '{}' to {} torrents.", settings.label, n)
                    }
                    LabelOutcome::DryRun(n) => log::info!(
                        "DRY RUN: would tag {} torrents with '{}'. Set DRY_RUN=false to apply tags.",
                        n,
                        settings.label
                    ),
                }
                LabelStatus::Done { outcome }
            }
            Err(e) => {
                log::error!("{}", e);
                LabelStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    };

    Ok(RunReport {
        summary,
        label: settings.label.clone(),
        label_status,
    })
}
