use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cnidarium::{StateDelta, StateRead, StateWrite, Storage};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Persisted set of item ids that have already been selected for publishing.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Known ids, or an empty set when nothing is stored or the read fails.
    async fn load(&self) -> HashSet<String>;

    /// Insert `id` and persist the whole set. Failures are logged, not returned.
    async fn add(&self, id: &str);
}

// One prefix, one key: the full id list is overwritten on every add.
const PUBLISHED_PREFIX: &str = "published";

fn ids_key() -> String {
    format!("{}/ids", PUBLISHED_PREFIX)
}

pub struct PublishedStore {
    storage: Storage,
    /// Serializes the load-modify-write in `add` within this process.
    write_lock: Mutex<()>,
}

impl PublishedStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let storage = Storage::load(data_dir.to_path_buf(), vec![PUBLISHED_PREFIX.to_string()])
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self {
            storage,
            write_lock: Mutex::new(()),
        })
    }

    async fn read_ids(&self) -> Result<HashSet<String>> {
        let snapshot = self.storage.latest_snapshot();
        let Some(bytes) = snapshot.get_raw(&ids_key()).await? else {
            return Ok(HashSet::new());
        };
        let ids: Vec<String> =
            serde_json::from_slice(&bytes).context("Failed to parse published id list")?;
        Ok(ids.into_iter().collect())
    }

    async fn write_ids(&self, ids: &HashSet<String>) -> Result<()> {
        // Sorted so the stored record is stable across rewrites.
        let sorted: BTreeSet<&String> = ids.iter().collect();
        let value = serde_json::to_vec(&sorted).context("serialize published ids")?;

        let mut delta = StateDelta::new(self.storage.latest_snapshot());
        delta.put_raw(ids_key(), value);
        self.storage.commit(delta).await?;
        Ok(())
    }
}

#[async_trait]
impl DedupStore for PublishedStore {
    async fn load(&self) -> HashSet<String> {
        match self.read_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Could not read published ids, starting from empty set");
                HashSet::new()
            }
        }
    }

    async fn add(&self, id: &str) {
        let _guard = self.write_lock.lock().await;
        // An unreadable record is left alone; rewriting it would drop the history.
        let mut ids = match self.read_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(item_id = id, error = %e, "Could not read published ids, skipping write");
                return;
            }
        };
        ids.insert(id.to_string());
        match self.write_ids(&ids).await {
            Ok(()) => debug!(item_id = id, total = ids.len(), "published id recorded"),
            Err(e) => warn!(item_id = id, error = %e, "Failed to persist published id"),
        }
    }
}
