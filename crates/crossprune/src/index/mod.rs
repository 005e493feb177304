pub mod identity;
pub mod inventory;

pub use identity::{FsResolver, IdentityResolver, ObjectIdentity, ResolvedObject};
pub use inventory::{CollectOptions, Collector, FileRecord, IdentityIndex, Inventory};
