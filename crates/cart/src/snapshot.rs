//! Snapshot types and the key-value persistence seam.
//!
//! A snapshot carries exactly the cart's four data fields; it holds no
//! behavior and no schema version. The file-backed store writes one JSON
//! file per key, atomically via a temp-rename so a crash mid-write never
//! clobbers the previous snapshot.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use velvet_mango_core::Price;

use crate::error::SnapshotError;
use crate::item::{CartItem, StoreSummary};

/// Fixed key under which the cart snapshot is persisted.
pub const CART_SNAPSHOT_KEY: &str = "cart-storage";

/// Serialized cart state: the four data fields and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Line items grouped by store key.
    pub items: BTreeMap<String, Vec<CartItem>>,
    /// Total quantity across all groupings.
    pub total_items: u32,
    /// Total `final_price * quantity` across all groupings.
    pub total_price: Price,
    /// Per-store summaries.
    pub stores: Vec<StoreSummary>,
}

/// A key-value backend for cart snapshots.
///
/// The trait is the seam between the cart and its storage: tests swap in
/// in-memory or failing backends, production uses [`FileSnapshotStore`].
pub trait SnapshotStore {
    /// Load the snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` when no usable snapshot exists, including when a
    /// stored value fails to decode.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] only for unexpected backend failures (e.g.
    /// permission denied), never for a missing or malformed value.
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, SnapshotError>;

    /// Store `snapshot` under `key`, replacing any previous value in full.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if encoding or writing fails.
    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), SnapshotError>;
}

/// File-per-key JSON snapshot store under a base directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file path backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The base directory of this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, SnapshotError> {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<CartSnapshot>(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to decode cart snapshot; treating as absent"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
