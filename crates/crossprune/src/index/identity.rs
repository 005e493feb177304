use crate::error::{CrossPruneError, Result};
use serde::Serialize;
use std::path::Path;

/// A filesystem object, independent of the path used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectIdentity {
    pub device_id: u64,
    pub object_id: u64,
}

/// Identity plus the total number of hardlinks the filesystem reports for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedObject {
    pub identity: ObjectIdentity,
    pub link_count: u64,
}

pub trait IdentityResolver {
    /// Resolves `path` to its object identity and hardlink count.
    ///
    /// Returns [`CrossPruneError::Inaccessible`] when the path is missing,
    /// unreadable, or the platform has no hardlink metadata.
    fn resolve(&self, path: &Path) -> Result<ResolvedObject>;
}

/// Resolves identities with `stat(2)`, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl IdentityResolver for FsResolver {
    fn resolve(&self, path: &Path) -> Result<ResolvedObject> {
        stat_object(path)
    }
}

#[cfg(unix)]
fn stat_object(path: &Path) -> Result<ResolvedObject> {
    use std::os::unix::fs::MetadataExt;

    let metadata = std::fs::metadata(path).map_err(|e| CrossPruneError::Inaccessible {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(ResolvedObject {
        identity: ObjectIdentity {
            device_id: metadata.dev(),
            object_id: metadata.ino(),
        },
        link_count: metadata.nlink(),
    })
}

#[cfg(not(unix))]
fn stat_object(path: &Path) -> Result<ResolvedObject> {
    Err(CrossPruneError::Inaccessible {
        path: path.to_path_buf(),
        reason: "hardlink counts are not available on this platform".to_string(),
    })
}
