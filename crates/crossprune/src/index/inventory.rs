use crate::index::identity::{IdentityResolver, ObjectIdentity, ResolvedObject};
use crate::service::{Item, TorrentService};
use crate::util::progress::create_progress_bar;
use indicatif::ProgressBar;
use std::collections::{HashMap, HashSet};

/// Object identity to the distinct item hashes that own a file with that identity.
pub type IdentityIndex = HashMap<ObjectIdentity, HashSet<String>>;

/// Outcome of resolving one declared file of one item.
///
/// `resolved` is `None` when the file could not be stat'ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub item_hash: String,
    pub file_index: u32,
    pub resolved: Option<ResolvedObject>,
}

/// Read-only snapshot produced by a full scan of every tracked item.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub identity_index: IdentityIndex,
    /// File records per item hash, in listing order. Items whose listing could
    /// not be fetched have no entry.
    pub records_by_item: HashMap<String, Vec<FileRecord>>,
    pub inaccessible: usize,
    pub files_scanned: usize,
}

impl Inventory {
    /// Number of distinct items owning a file with this identity.
    pub fn owners(&self, identity: &ObjectIdentity) -> usize {
        self.identity_index.get(identity).map_or(0, HashSet::len)
    }

    pub fn records(&self, hash: &str) -> Option<&[FileRecord]> {
        self.records_by_item.get(hash).map(Vec::as_slice)
    }

    pub fn unique_identities(&self) -> usize {
        self.identity_index.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    pub show_progress: bool,
}

/// Builds the global [`Inventory`] from every item, before any exclusion is
/// applied. Excluded items still own their links.
pub struct Collector<'a> {
    service: &'a dyn TorrentService,
    resolver: &'a dyn IdentityResolver,
    options: CollectOptions,
}

impl<'a> Collector<'a> {
    pub fn new(
        service: &'a dyn TorrentService,
        resolver: &'a dyn IdentityResolver,
        options: CollectOptions,
    ) -> Self {
        Self {
            service,
            resolver,
            options,
        }
    }

    pub fn collect(&self, items: &[Item]) -> Inventory {
        let mut inventory = Inventory::default();
        let progress = if self.options.show_progress {
            create_progress_bar(items.len() as u64, "Scanning torrent files")
        } else {
            ProgressBar::hidden()
        };

        for (i, item) in items.iter().enumerate() {
            if !self.options.show_progress && ((i + 1) % 500 == 0 || i + 1 == items.len()) {
                log::debug!("Scanning torrent {}/{}", i + 1, items.len());
            }
            self.collect_item(item, &mut inventory);
            progress.inc(1);
        }

        progress.finish_and_clear();
        log::info!(
            "Scanned {} files across {} torrents ({} inaccessible)",
            inventory.files_scanned,
            items.len(),
            inventory.inaccessible
        );
        log::info!("Unique inodes: {}", inventory.unique_identities());

        inventory
    }

    fn collect_item(&self, item: &Item, inventory: &mut Inventory) {
        let files = match self.service.list_files(&item.hash) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Skipping file listing for '{}': {}", item.name, e);
                return;
            }
        };

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            inventory.files_scanned += 1;
            let path = item.save_path.join(&file.name);

            let resolved = match self.resolver.resolve(&path) {
                Ok(resolved) => {
                    inventory
                        .identity_index
                        .entry(resolved.identity)
                        .or_default()
                        .insert(item.hash.clone());
                    Some(resolved)
                }
                Err(e) => {
                    log::debug!("{}", e);
                    inventory.inaccessible += 1;
                    None
                }
            };

            records.push(FileRecord {
                item_hash: item.hash.clone(),
                file_index: file.index,
                resolved,
            });
        }

        inventory.records_by_item.insert(item.hash.clone(), records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CrossPruneError, Result};
    use crate::service::ItemFile;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    struct MapResolver(HashMap<PathBuf, ResolvedObject>);

    impl IdentityResolver for MapResolver {
        fn resolve(&self, path: &Path) -> Result<ResolvedObject> {
            self.0.get(path).copied().ok_or_else(|| CrossPruneError::Inaccessible {
                path: path.to_path_buf(),
                reason: "missing".to_string(),
            })
        }
    }

    struct ListingService {
        listings: HashMap<String, Vec<ItemFile>>,
        calls: RefCell<Vec<String>>,
    }

    impl TorrentService for ListingService {
        fn version(&self) -> Result<String> {
            Ok("test".to_string())
        }

        fn list_items(&self) -> Result<Vec<Item>> {
            Ok(Vec::new())
        }

        fn list_files(&self, hash: &str) -> Result<Vec<ItemFile>> {
            self.calls.borrow_mut().push(hash.to_string());
            self.listings
                .get(hash)
                .cloned()
                .ok_or_else(|| CrossPruneError::ListingUnavailable {
                    hash: hash.to_string(),
                    message: "not found".to_string(),
                })
        }

        fn apply_label(&self, _hashes: &[String], _label: &str) -> Result<()> {
            Ok(())
        }
    }

    fn item(hash: &str) -> Item {
        Item {
            hash: hash.to_string(),
            name: hash.to_uppercase(),
            save_path: PathBuf::from("/data"),
            size: 1,
            tags: Vec::new(),
            category: String::new(),
            added_at: Utc::now(),
        }
    }

    fn file(index: u32, name: &str) -> ItemFile {
        ItemFile {
            index,
            name: name.to_string(),
        }
    }

    fn object(ino: u64, links: u64) -> ResolvedObject {
        ResolvedObject {
            identity: ObjectIdentity {
                device_id: 1,
                object_id: ino,
            },
            link_count: links,
        }
    }

    #[test]
    fn test_collect_builds_index_and_records() {
        let service = ListingService {
            listings: HashMap::from([
                (
                    "a".to_string(),
                    vec![file(0, "a/one.mkv"), file(1, "a/missing.nfo")],
                ),
                ("b".to_string(), vec![file(0, "b/one.mkv")]),
            ]),
            calls: RefCell::new(Vec::new()),
        };
        let resolver = MapResolver(HashMap::from([
            (PathBuf::from("/data/a/one.mkv"), object(10, 2)),
            (PathBuf::from("/data/b/one.mkv"), object(10, 2)),
        ]));

        let collector = Collector::new(&service, &resolver, CollectOptions::default());
        let inventory = collector.collect(&[item("a"), item("b"), item("c")]);

        assert_eq!(*service.calls.borrow(), vec!["a", "b", "c"]);
        assert_eq!(inventory.files_scanned, 3);
        assert_eq!(inventory.inaccessible, 1);
        assert_eq!(inventory.unique_identities(), 1);
        assert_eq!(inventory.owners(&object(10, 2).identity), 2);

        let a = inventory.records("a").unwrap();
        assert_eq!(a.len(), 2);
        assert!(a[0].resolved.is_some());
        assert_eq!(a[1].file_index, 1);
        assert!(a[1].resolved.is_none());

        assert!(inventory.records("c").is_none());
    }

    #[test]
    fn test_owners_counts_items_not_files() {
        let service = ListingService {
            listings: HashMap::from([(
                "a".to_string(),
                vec![file(0, "x.mkv"), file(1, "y.mkv")],
            )]),
            calls: RefCell::new(Vec::new()),
        };
        let resolver = MapResolver(HashMap::from([
            (PathBuf::from("/data/x.mkv"), object(7, 2)),
            (PathBuf::from("/data/y.mkv"), object(7, 2)),
        ]));

        let inventory = Collector::new(&service, &resolver, CollectOptions::default())
            .collect(&[item("a")]);

        assert_eq!(inventory.owners(&object(7, 2).identity), 1);
    }
}
