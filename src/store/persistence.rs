//! Sled-backed registry store
//!
//! The snapshot (without its log) lives under a single key in the state
//! tree, together with the number of live log entries. Log entries live in
//! their own tree keyed by big-endian sequence number, so they iterate in
//! order.

use super::RegistryStore;
use crate::error::StorageError;
use crate::events::LogEntry;
use crate::registry::RegistrySnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const STATE_TREE: &str = "registry_state";
const LOG_TREE: &str = "registry_log";
const STATE_KEY: &[u8] = b"snapshot";

#[derive(Serialize, Deserialize)]
struct StoredState {
    snapshot: RegistrySnapshot,
    log_len: u64,
}

/// Sled-based registry store
pub struct SledRegistryStore {
    db: sled::Db,
    state: sled::Tree,
    log: sled::Tree,
}

impl SledRegistryStore {
    /// Open (or create) a store at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let state = db.open_tree(STATE_TREE)?;
        let log = db.open_tree(LOG_TREE)?;
        Ok(Self { db, state, log })
    }

    /// Whether a registry has been saved here
    pub fn exists(&self) -> Result<bool, StorageError> {
        Ok(self.state.contains_key(STATE_KEY)?)
    }

    /// Sequence of the first entry in `log` that is not already stored
    ///
    /// The stored history is extended in place only when its last entry
    /// matches ours byte for byte; otherwise the whole log is rewritten.
    fn first_unstored(&self, log: &[LogEntry]) -> Result<u64, StorageError> {
        let Some(bytes) = self.state.get(STATE_KEY)? else {
            return Ok(0);
        };
        let stored: StoredState = bincode::deserialize(&bytes)?;
        let stored_len = stored.log_len;
        if stored_len == 0 || stored_len > log.len() as u64 {
            return Ok(0);
        }

        let last = stored_len - 1;
        let on_disk = self.log.get(last.to_be_bytes())?;
        let ours = bincode::serialize(&log[last as usize])?;
        if on_disk.as_deref() == Some(ours.as_slice()) {
            Ok(stored_len)
        } else {
            Ok(0)
        }
    }
}

impl RegistryStore for SledRegistryStore {
    fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError> {
        let Some(bytes) = self.state.get(STATE_KEY)? else {
            return Ok(None);
        };
        let stored: StoredState = bincode::deserialize(&bytes)?;

        let mut snapshot = stored.snapshot;
        snapshot.log = Vec::with_capacity(stored.log_len as usize);
        for sequence in 0..stored.log_len {
            let bytes = self.log.get(sequence.to_be_bytes())?.ok_or_else(|| {
                StorageError::Corrupt(format!("missing log entry {}", sequence))
            })?;
            snapshot.log.push(bincode::deserialize(&bytes)?);
        }

        debug!(
            agents = snapshot.agents.len(),
            log_len = stored.log_len,
            "Loaded registry snapshot"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
        // Entries first: the state record decides how many of them count.
        let start = self.first_unstored(&snapshot.log)?;
        let mut appended = sled::Batch::default();
        for entry in &snapshot.log[start as usize..] {
            appended.insert(entry.sequence.to_be_bytes().to_vec(), bincode::serialize(entry)?);
        }
        self.log.apply_batch(appended)?;

        let log_len = snapshot.log.len() as u64;
        let stored = StoredState {
            snapshot: RegistrySnapshot {
                roles: snapshot.roles.clone(),
                default_traits: snapshot.default_traits,
                token: snapshot.token,
                city: snapshot.city.clone(),
                agents: snapshot.agents.clone(),
                owner_to_agent: snapshot.owner_to_agent.clone(),
                log: Vec::new(),
            },
            log_len,
        };
        self.state.insert(STATE_KEY, bincode::serialize(&stored)?)?;
        self.db.flush()?;

        let stale: Vec<sled::IVec> = self
            .log
            .range(log_len.to_be_bytes()..)
            .keys()
            .collect::<Result<_, _>>()?;
        if !stale.is_empty() {
            let mut trimmed = sled::Batch::default();
            for key in stale {
                trimmed.remove(key);
            }
            self.log.apply_batch(trimmed)?;
            self.db.flush()?;
        }

        debug!(
            agents = snapshot.agents.len(),
            log_len,
            written = log_len.saturating_sub(start),
            "Saved registry snapshot"
        );
        Ok(())
    }
}
