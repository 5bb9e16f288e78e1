use docverify_types::{DocverifyError, DocverifyResult, Fingerprint, RecentActivityEntry};
use sled::{Db, Tree};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RECENT_TREE: &str = "recent";

/// Bounded list of recently registered fingerprints, newest first. Keys are
/// sled-generated ids stored big-endian, so tree order is insertion order.
pub struct RecordCache {
    db: Db,
    recent: Tree,
    capacity: usize,
    path: Option<PathBuf>,
}

impl RecordCache {
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> DocverifyResult<Self> {
        let path = path.as_ref();
        debug!("Opening recent-activity cache at {:?}", path);

        let db = sled::Config::new()
            .path(path)
            .open()
            .map_err(|e| DocverifyError::Storage(format!("Failed to open cache: {}", e)))?;

        Self::from_db(db, capacity, Some(path.to_path_buf()))
    }

    pub fn in_memory(capacity: usize) -> DocverifyResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| DocverifyError::Storage(format!("Failed to open temp cache: {}", e)))?;

        Self::from_db(db, capacity, None)
    }

    /// Opens the on-disk cache, or a throwaway one if that fails. Losing
    /// recent activity is never fatal.
    pub fn open_or_ephemeral(path: impl AsRef<Path>, capacity: usize) -> DocverifyResult<Self> {
        match Self::open(path.as_ref(), capacity) {
            Ok(cache) => Ok(cache),
            Err(e) => {
                warn!("{}; recent activity will not persist this session", e);
                Self::in_memory(capacity)
            }
        }
    }

    fn from_db(db: Db, capacity: usize, path: Option<PathBuf>) -> DocverifyResult<Self> {
        let recent = db
            .open_tree(RECENT_TREE)
            .map_err(|e| DocverifyError::Storage(format!("Failed to open {} tree: {}", RECENT_TREE, e)))?;

        Ok(Self {
            db,
            recent,
            capacity: capacity.max(1),
            path,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn record_success(&self, fingerprint: Fingerprint, label: impl Into<String>) -> DocverifyResult<RecentActivityEntry> {
        let entry = RecentActivityEntry::new(fingerprint, label);

        let id = self
            .db
            .generate_id()
            .map_err(|e| DocverifyError::Storage(format!("Failed to allocate id: {}", e)))?;
        let value = bincode::serialize(&entry)
            .map_err(|e| DocverifyError::Serialization(format!("Recent entry serialize error: {}", e)))?;

        self.recent
            .insert(id.to_be_bytes(), value)
            .map_err(|e| DocverifyError::Storage(format!("Recent entry write error: {}", e)))?;

        self.evict()?;
        self.flush()?;
        Ok(entry)
    }

    fn evict(&self) -> DocverifyResult<()> {
        while self.recent.len() > self.capacity {
            let evicted = self
                .recent
                .pop_min()
                .map_err(|e| DocverifyError::Storage(format!("Eviction error: {}", e)))?;
            if evicted.is_none() {
                break;
            }
        }
        Ok(())
    }

    pub fn list(&self) -> DocverifyResult<Vec<RecentActivityEntry>> {
        let mut entries = Vec::with_capacity(self.capacity);

        for result in self.recent.iter().rev().take(self.capacity) {
            let (_, value) = result
                .map_err(|e| DocverifyError::Storage(format!("Failed to iterate recent activity: {}", e)))?;

            match bincode::deserialize::<RecentActivityEntry>(&value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping unreadable recent-activity entry: {}", e),
            }
        }

        Ok(entries)
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn clear(&self) -> DocverifyResult<()> {
        self.recent
            .clear()
            .map_err(|e| DocverifyError::Storage(format!("Failed to clear recent activity: {}", e)))?;
        self.flush()?;
        info!("Recent activity cleared");
        Ok(())
    }

    fn flush(&self) -> DocverifyResult<()> {
        self.db
            .flush()
            .map_err(|e| DocverifyError::Storage(format!("Flush error: {}", e)))?;
        Ok(())
    }
}
