//! JSON shapes returned by the qBittorrent WebUI API v2.

use crate::service::{split_tags, Item, ItemFile};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// Entry of `GET /api/v2/torrents/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentInfo {
    pub hash: String,
    pub name: String,
    pub save_path: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub added_on: i64,
}

impl From<TorrentInfo> for Item {
    fn from(info: TorrentInfo) -> Self {
        Item {
            hash: info.hash,
            name: info.name,
            save_path: PathBuf::from(info.save_path),
            size: info.size.max(0) as u64,
            tags: split_tags(&info.tags),
            category: info.category,
            added_at: DateTime::from_timestamp(info.added_on, 0)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

/// Entry of `GET /api/v2/torrents/files`. Servers older than 2.8.2 omit `index`.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentFileInfo {
    #[serde(default)]
    pub index: Option<u32>,
    pub name: String,
}

/// Falls back to listing position when the server sends no index.
pub fn into_item_files(files: Vec<TorrentFileInfo>) -> Vec<ItemFile> {
    files
        .into_iter()
        .enumerate()
        .map(|(position, file)| ItemFile {
            index: file.index.unwrap_or(position as u32),
            name: file.name,
        })
        .collect()
}
