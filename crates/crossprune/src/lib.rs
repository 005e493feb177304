pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod label;
pub mod qbit;
pub mod report;
pub mod run;
pub mod schedule;
pub mod service;
pub mod util;

pub use classify::{
    classify_records, is_externally_linked, Classification, Classifier, ExclusionPolicy,
    ExclusionReason, PartialAccessPolicy, Partition,
};
pub use config::Settings;
pub use error::{CrossPruneError, Result};
pub use index::{
    CollectOptions, Collector, FileRecord, FsResolver, IdentityIndex, IdentityResolver, Inventory,
    ObjectIdentity, ResolvedObject,
};
pub use label::{apply_label, LabelOutcome};
pub use qbit::QbitClient;
pub use report::{ReclaimableEntry, Summary};
pub use run::{run_once, LabelStatus, RunReport};
pub use schedule::{parse_schedule, Scheduler};
pub use service::{Item, ItemFile, TorrentService};
