#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use crossprune_lib::{
    Classifier, CollectOptions, Collector, CrossPruneError, IdentityResolver, Item, ItemFile,
    ObjectIdentity, ResolvedObject, Result, Settings, TorrentService,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEVICE: u64 = 42;

/// In-memory torrent service. Items without a listing fail `list_files`.
#[derive(Default)]
pub struct FakeService {
    pub items: Vec<Item>,
    pub listings: HashMap<String, Vec<ItemFile>>,
    pub fail_items: bool,
    pub fail_label: bool,
    pub label_calls: RefCell<Vec<(Vec<String>, String)>>,
}

impl TorrentService for FakeService {
    fn version(&self) -> Result<String> {
        Ok("v4.6.0".to_string())
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        if self.fail_items {
            return Err(CrossPruneError::ServiceUnavailable("connection refused".to_string()));
        }
        Ok(self.items.clone())
    }

    fn list_files(&self, hash: &str) -> Result<Vec<ItemFile>> {
        self.listings
            .get(hash)
            .cloned()
            .ok_or_else(|| CrossPruneError::ListingUnavailable {
                hash: hash.to_string(),
                message: "404".to_string(),
            })
    }

    fn apply_label(&self, hashes: &[String], label: &str) -> Result<()> {
        self.label_calls
            .borrow_mut()
            .push((hashes.to_vec(), label.to_string()));
        if self.fail_label {
            return Err(CrossPruneError::Api {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeResolver {
    pub objects: HashMap<PathBuf, ResolvedObject>,
}

impl IdentityResolver for FakeResolver {
    fn resolve(&self, path: &Path) -> Result<ResolvedObject> {
        self.objects
            .get(path)
            .copied()
            .ok_or_else(|| CrossPruneError::Inaccessible {
                path: path.to_path_buf(),
                reason: "No such file or directory".to_string(),
            })
    }
}

/// A declared torrent file, optionally backed by an object `(inode, nlink)`.
pub struct FakeFile {
    pub name: String,
    pub object: Option<(u64, u64)>,
}

pub fn linked(name: &str, inode: u64, nlink: u64) -> FakeFile {
    FakeFile {
        name: name.to_string(),
        object: Some((inode, nlink)),
    }
}

pub fn missing(name: &str) -> FakeFile {
    FakeFile {
        name: name.to_string(),
        object: None,
    }
}

pub fn item(hash: &str, size: u64) -> Item {
    Item {
        hash: hash.to_string(),
        name: format!("Torrent {}", hash.to_uppercase()),
        save_path: PathBuf::from("/library").join(hash),
        size,
        tags: Vec::new(),
        category: String::new(),
        added_at: Utc::now() - Duration::days(365),
    }
}

pub fn tagged(mut item: Item, tag: &str) -> Item {
    item.tags.push(tag.to_string());
    item
}

pub fn in_category(mut item: Item, category: &str) -> Item {
    item.category = category.to_string();
    item
}

#[derive(Default)]
pub struct FakeLibrary {
    pub service: FakeService,
    pub resolver: FakeResolver,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item, files: Vec<FakeFile>) -> &mut Self {
        let listing = files
            .iter()
            .enumerate()
            .map(|(index, file)| ItemFile {
                index: index as u32,
                name: file.name.clone(),
            })
            .collect();

        for file in &files {
            if let Some((inode, nlink)) = file.object {
                self.resolver.objects.insert(
                    item.save_path.join(&file.name),
                    ResolvedObject {
                        identity: ObjectIdentity {
                            device_id: DEVICE,
                            object_id: inode,
                        },
                        link_count: nlink,
                    },
                );
            }
        }

        self.service.listings.insert(item.hash.clone(), listing);
        self.service.items.push(item);
        self
    }

    /// Adds an item whose file listing cannot be fetched.
    pub fn add_unlisted(&mut self, item: Item) -> &mut Self {
        self.service.items.push(item);
        self
    }
}

pub struct Buckets {
    pub retained: Vec<String>,
    pub reclaimable: Vec<String>,
    pub indeterminate: Vec<String>,
    pub excluded: usize,
}

/// Runs the collector and classifier directly and returns hashes per bucket.
pub fn classify_library(library: &FakeLibrary, settings: &Settings, now: DateTime<Utc>) -> Buckets {
    let items = library.service.items.clone();
    let inventory = Collector::new(&library.service, &library.resolver, CollectOptions::default())
        .collect(&items);
    let policy = settings.exclusion_policy();
    let partition =
        Classifier::new(&inventory, &policy, settings.partial_access).partition(&items, now);

    fn hashes(bucket: &[&Item]) -> Vec<String> {
        bucket.iter().map(|i| i.hash.clone()).collect()
    }

    Buckets {
        retained: hashes(&partition.retained),
        reclaimable: hashes(&partition.reclaimable),
        indeterminate: hashes(&partition.indeterminate),
        excluded: partition.excluded,
    }
}
