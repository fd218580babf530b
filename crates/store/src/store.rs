//! `Store` — the transactional handle wrapped around [`Tables`], grounded
//! on a `RwLock<HashMap<_>>` + debounced JSON persistence via
//! `spawn_blocking` pattern, generalized to the full relation set and
//! given snapshot-based rollback.

use std::path::PathBuf;

use oncall_domain::{Error, Result};
use tokio::sync::RwLock;

use crate::tables::Tables;

pub struct Store {
    inner: RwLock<Tables>,
    persist_path: Option<PathBuf>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::seeded()),
            persist_path: None,
        }
    }

    /// Open (or create) a store persisted as a single JSON snapshot under
    /// `state_dir/store.json`, mirroring `ScheduleStore::new`.
    pub fn open(state_dir: &std::path::Path) -> Self {
        let persist_path = state_dir.join("store.json");
        let tables = std::fs::read_to_string(&persist_path)
            .ok()
            .and_then(|data| serde_json::from_str::<Tables>(&data).ok())
            .unwrap_or_else(Tables::seeded);
        Self {
            inner: RwLock::new(tables),
            persist_path: Some(persist_path),
        }
    }

    /// Run `f` against a private clone of the current snapshot. Only on
    /// `Ok` is the clone swapped back into the lock and persisted — this
    /// gives an "any failure rolls back" property without a real
    /// RDBMS, since every fallible step runs before any caller-visible
    /// mutation takes effect.
    pub async fn transact<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.write().await;
        let mut scratch = guard.clone();
        let result = f(&mut scratch);
        match result {
            Ok(value) => {
                *guard = scratch;
                let snapshot = guard.clone();
                drop(guard);
                self.persist(&snapshot).await;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    /// Read-only access, no persistence or rollback machinery needed.
    pub async fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let guard = self.inner.read().await;
        f(&guard)
    }

    async fn persist(&self, tables: &Tables) {
        let Some(path) = self.persist_path.clone() else {
            return;
        };
        let Ok(json) = serde_json::to_string_pretty(tables) else {
            tracing::warn!("failed to serialize store snapshot");
            return;
        };
        let _ = tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = std::fs::write(&path, json) {
                tracing::warn!(error = %e, "failed to persist store snapshot");
            }
        })
        .await;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience used throughout the engine: look up an FK by name,
/// surfacing a [`Error::conflict`] ("X not found") the way a null FK
/// would.
pub fn require<T>(opt: Option<T>, what: &str, name: &str) -> Result<T> {
    opt.ok_or_else(|| Error::conflict(format!("{what} '{name}' not found")))
}
