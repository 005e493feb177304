use crate::error::{CrossPruneError, Result};
use crate::service::TorrentService;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "count", rename_all = "snake_case")]
pub enum LabelOutcome {
    /// Nothing was sent; this many items would have been labelled.
    DryRun(usize),
    Applied(usize),
}

impl LabelOutcome {
    pub fn count(&self) -> usize {
        match self {
            LabelOutcome::DryRun(n) | LabelOutcome::Applied(n) => *n,
        }
    }
}

/// Labels every hash with one batch request, or none at all in dry-run mode.
///
/// Labelling an already-labelled item is a no-op on the service side.
pub fn apply_label(
    service: &dyn TorrentService,
    hashes: &[String],
    label: &str,
    dry_run: bool,
) -> Result<LabelOutcome> {
    if dry_run {
        return Ok(LabelOutcome::DryRun(hashes.len()));
    }
    if hashes.is_empty() {
        return Ok(LabelOutcome::Applied(0));
    }

    service
        .apply_label(hashes, label)
        .map_err(|e| CrossPruneError::LabelApplicationFailed {
            label: label.to_string(),
            message: e.to_string(),
        })?;

    Ok(LabelOutcome::Applied(hashes.len()))
}
