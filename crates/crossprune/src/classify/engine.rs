//! Hardlink reconciliation.
//!
//! A file is externally linked when the filesystem reports more hardlinks than
//! there are distinct tracked items owning that object. One externally linked
//! file is enough to retain the whole item.

use crate::classify::policy::ExclusionPolicy;
use crate::error::{CrossPruneError, Result};
use crate::index::{FileRecord, Inventory, ResolvedObject};
use crate::service::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// At least one file is linked from outside the tracked set.
    Retained,
    /// Every resolved file is accounted for by tracked items.
    Reclaimable,
    /// No usable file data.
    Indeterminate,
}

/// How to treat an item that has resolved files, none externally linked, and
/// at least one inaccessible file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialAccessPolicy {
    #[default]
    Reclaim,
    Indeterminate,
}

impl PartialAccessPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartialAccessPolicy::Reclaim => "reclaim",
            PartialAccessPolicy::Indeterminate => "indeterminate",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reclaim" => Ok(PartialAccessPolicy::Reclaim),
            "indeterminate" => Ok(PartialAccessPolicy::Indeterminate),
            _ => Err(CrossPruneError::Config(format!(
                "Invalid partial access policy: {} (valid: reclaim, indeterminate)",
                s
            ))),
        }
    }
}

/// `owners` is the number of distinct tracked items owning the object. A link
/// count below that is treated as fully accounted for.
pub fn is_externally_linked(object: &ResolvedObject, owners: usize) -> bool {
    object.link_count > owners as u64
}

#[derive(Debug, Default, Clone, Copy)]
struct Evidence {
    resolved: usize,
    inaccessible: usize,
}

/// Classifies one item from its file records. `None` means no listing was
/// available.
pub fn classify_records(
    records: Option<&[FileRecord]>,
    inventory: &Inventory,
    partial_access: PartialAccessPolicy,
) -> Classification {
    let Some(records) = records else {
        return Classification::Indeterminate;
    };

    let scan = records.iter().try_fold(Evidence::default(), |mut evidence, record| {
        match &record.resolved {
            Some(object) if is_externally_linked(object, inventory.owners(&object.identity)) => {
                ControlFlow::Break(())
            }
            Some(_) => {
                evidence.resolved += 1;
                ControlFlow::Continue(evidence)
            }
            None => {
                evidence.inaccessible += 1;
                ControlFlow::Continue(evidence)
            }
        }
    });

    match scan {
        ControlFlow::Break(()) => Classification::Retained,
        ControlFlow::Continue(evidence) if evidence.resolved == 0 => Classification::Indeterminate,
        ControlFlow::Continue(evidence)
            if evidence.inaccessible > 0
                && partial_access == PartialAccessPolicy::Indeterminate =>
        {
            Classification::Indeterminate
        }
        ControlFlow::Continue(_) => Classification::Reclaimable,
    }
}

/// Disjoint buckets of non-excluded items, each in input order.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub retained: Vec<&'a Item>,
    pub reclaimable: Vec<&'a Item>,
    pub indeterminate: Vec<&'a Item>,
    pub excluded: usize,
}

impl<'a> Partition<'a> {
    pub fn classified(&self) -> usize {
        self.retained.len() + self.reclaimable.len() + self.indeterminate.len()
    }
}

pub struct Classifier<'a> {
    inventory: &'a Inventory,
    policy: &'a ExclusionPolicy,
    partial_access: PartialAccessPolicy,
}

impl<'a> Classifier<'a> {
    pub fn new(
        inventory: &'a Inventory,
        policy: &'a ExclusionPolicy,
        partial_access: PartialAccessPolicy,
    ) -> Self {
        Self {
            inventory,
            policy,
            partial_access,
        }
    }

    /// `None` when the item is excluded by policy.
    pub fn classify_item(&self, item: &Item, now: DateTime<Utc>) -> Option<Classification> {
        if let Some(reason) = self.policy.exclusion_reason(item, now) {
            log::debug!("Excluding '{}': {}", item.name, reason);
            return None;
        }

        Some(classify_records(
            self.inventory.records(&item.hash),
            self.inventory,
            self.partial_access,
        ))
    }

    pub fn partition<'i>(&self, items: &'i [Item], now: DateTime<Utc>) -> Partition<'i> {
        let mut partition = Partition::default();

        for item in items {
            match self.classify_item(item, now) {
                Some(Classification::Retained) => partition.retained.push(item),
                Some(Classification::Reclaimable) => partition.reclaimable.push(item),
                Some(Classification::Indeterminate) => partition.indeterminate.push(item),
                None => partition.excluded += 1,
            }
        }

        partition
    }
}
