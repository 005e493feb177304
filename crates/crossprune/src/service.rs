//! The torrent directory service as seen by the rest of the crate.
//!
//! Everything that talks to a torrent client goes through [`TorrentService`],
//! so the scan and classification passes can be driven by an in-memory fake.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A tracked torrent and the metadata the exclusion policy looks at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub hash: String,
    pub name: String,
    pub save_path: PathBuf,
    pub size: u64,
    pub tags: Vec<String>,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

/// One entry of a torrent's file listing, relative to its save path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemFile {
    pub index: u32,
    pub name: String,
}

pub trait TorrentService {
    /// Version string reported by the service, for logging only.
    fn version(&self) -> Result<String>;

    fn list_items(&self) -> Result<Vec<Item>>;

    /// File listing for a single item. Failures are per item and never abort a scan.
    fn list_files(&self, hash: &str) -> Result<Vec<ItemFile>>;

    /// Adds `label` to every item in `hashes` with a single batch request.
    fn apply_label(&self, hashes: &[String], label: &str) -> Result<()>;
}

/// Splits a comma-joined tag string, trimming whitespace and dropping empties.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
