//! Time-boxed cache of the species list, color list and pose table.
//!
//! Readers share an `Arc<Snapshot>`; a refresh swaps in a new one. The
//! update mutex makes concurrent callers wait for a single refresh instead
//! of each fetching their own.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dti_core::{Catalog, Color, NameIndex, Species, ValidPoses};
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;

#[derive(Debug)]
pub(crate) struct Snapshot {
    pub species: NameIndex<Species>,
    pub colors: NameIndex<Color>,
    pub valid_poses: ValidPoses,
    fetched_at: Instant,
}

impl Snapshot {
    pub(crate) fn new(catalog: Catalog, valid_poses: ValidPoses) -> Self {
        Self {
            species: NameIndex::new(catalog.species),
            colors: NameIndex::new(catalog.colors),
            valid_poses,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Debug)]
pub(crate) struct Cache {
    current: RwLock<Option<Arc<Snapshot>>>,
    update: Mutex<()>,
    ttl: Duration,
}

impl Cache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            update: Mutex::new(()),
            ttl,
        }
    }

    /// The cached snapshot, or a fresh one from `fetch` when it has expired.
    pub(crate) async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Snapshot>>,
    {
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }

        let _guard = self.update.lock().await;
        // Someone else may have refreshed while we waited.
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }

        let snapshot = Arc::new(fetch().await?);
        tracing::info!(
            species = snapshot.species.len(),
            colors = snapshot.colors.len(),
            "refreshed species and color cache"
        );
        *self.current.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub(crate) async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    async fn fresh(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(self.ttl))
            .cloned()
    }
}
