//! # Snapshot Store
//!
//! Durable mapping from giveaway id to [`Giveaway`], surviving process
//! restart. The active set is one JSON snapshot replaced with an atomic
//! temp-file-then-rename swap, so a crash mid-write can never leave a
//! partially-written snapshot observable to a concurrent load. Ended
//! giveaways are appended to a separate JSON-lines archive that the core
//! never reads back.
//!
//! Every mutation is durable before the call returns: `upsert` and `remove`
//! perform read-modify-write against the full snapshot under an internal
//! mutex and fsync the temp file before promoting it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{GiveawayError, Result};
use crate::models::Giveaway;

const SNAPSHOT_FILE: &str = "giveaways.json";
const SNAPSHOT_TMP_FILE: &str = "giveaways.json.tmp";
const ARCHIVE_FILE: &str = "archive.jsonl";

/// Durable store for active giveaways plus an append-only archive
#[derive(Debug)]
pub struct SnapshotStore {
    snapshot_path: PathBuf,
    tmp_path: PathBuf,
    archive_path: PathBuf,
    state: Mutex<BTreeMap<Uuid, Giveaway>>,
}

impl SnapshotStore {
    /// Open the store rooted at `data_dir`, loading any existing snapshot.
    ///
    /// A missing snapshot is an empty store; a malformed one is
    /// [`GiveawayError::CorruptState`] and must abort startup rather than
    /// proceed with partial state.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .await
            .map_err(|e| GiveawayError::storage("create data dir", e.to_string()))?;

        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        let state = Self::load(&snapshot_path).await?;

        info!(
            snapshot = %snapshot_path.display(),
            active_giveaways = state.len(),
            "Giveaway store opened"
        );

        Ok(Self {
            snapshot_path,
            tmp_path: data_dir.join(SNAPSHOT_TMP_FILE),
            archive_path: data_dir.join(ARCHIVE_FILE),
            state: Mutex::new(state),
        })
    }

    /// Deserialize a persisted snapshot from `path`
    pub async fn load(path: &Path) -> Result<BTreeMap<Uuid, Giveaway>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(GiveawayError::storage("read snapshot", e.to_string())),
        };

        let state: BTreeMap<Uuid, Giveaway> = serde_json::from_slice(&raw)
            .map_err(|e| GiveawayError::corrupt_state(path.display().to_string(), e.to_string()))?;

        for giveaway in state.values() {
            giveaway.check_invariants().map_err(|violation| {
                GiveawayError::corrupt_state(path.display().to_string(), violation)
            })?;
        }

        Ok(state)
    }

    /// Clone of the full active set
    pub async fn snapshot(&self) -> BTreeMap<Uuid, Giveaway> {
        self.state.lock().await.clone()
    }

    /// Fetch one giveaway by id
    pub async fn get(&self, id: Uuid) -> Option<Giveaway> {
        self.state.lock().await.get(&id).cloned()
    }

    /// Number of active giveaways
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    /// Whether the active set is empty
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }

    /// Insert or replace a giveaway; durable before returning
    pub async fn upsert(&self, giveaway: Giveaway) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.insert(giveaway.id, giveaway);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    /// Remove a giveaway from the active set; durable before returning
    pub async fn remove(&self, id: Uuid) -> Result<Option<Giveaway>> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let removed = next.remove(&id);
        if removed.is_some() {
            self.persist(&next).await?;
            *state = next;
        }
        Ok(removed)
    }

    /// Append an ended giveaway to the archive as one JSON line.
    ///
    /// At-least-once: a crash between archival and the snapshot `remove`
    /// makes recovery archive the same record again, so readers must
    /// deduplicate by giveaway id. Allocation state lives in the snapshot,
    /// never here, so a duplicate line is audit noise, not a correctness
    /// problem.
    pub async fn archive(&self, giveaway: &Giveaway) -> Result<()> {
        let mut line = serde_json::to_vec(giveaway)
            .map_err(|e| GiveawayError::storage("serialize archive record", e.to_string()))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.archive_path)
            .await
            .map_err(|e| GiveawayError::storage("open archive", e.to_string()))?;
        file.write_all(&line)
            .await
            .map_err(|e| GiveawayError::storage("append archive", e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| GiveawayError::storage("sync archive", e.to_string()))?;

        debug!(giveaway_id = %giveaway.id, "Giveaway archived");
        Ok(())
    }

    /// Write the snapshot to the temp file, fsync, then atomically promote.
    ///
    /// On failure the live snapshot is untouched and the in-memory state is
    /// not updated, so the failed transition leaves the store unchanged.
    async fn persist(&self, state: &BTreeMap<Uuid, Giveaway>) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(state)
            .map_err(|e| GiveawayError::storage("serialize snapshot", e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.tmp_path)
            .await
            .map_err(|e| GiveawayError::storage("open temp snapshot", e.to_string()))?;
        file.write_all(&encoded)
            .await
            .map_err(|e| GiveawayError::storage("write temp snapshot", e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| GiveawayError::storage("sync temp snapshot", e.to_string()))?;
        drop(file);

        fs::rename(&self.tmp_path, &self.snapshot_path)
            .await
            .map_err(|e| GiveawayError::storage("promote snapshot", e.to_string()))?;

        Ok(())
    }
}
