use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{info, warn};

use nd_core::{ArticleSource, ArticleTable, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Fresh,
    Stale,
    Loading,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a loaded snapshot counts as fresh.
    pub ttl: Duration,
    /// Upper bound on a single upstream load.
    pub load_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            load_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Default)]
struct Slot {
    table: Option<Arc<ArticleTable>>,
    loaded_at: Option<Instant>,
}

impl Slot {
    fn fresh_table(&self, ttl: Duration) -> Option<Arc<ArticleTable>> {
        match (&self.table, self.loaded_at) {
            (Some(table), Some(at)) if at.elapsed() < ttl => Some(Arc::clone(table)),
            _ => None,
        }
    }
}

/// Whole-table cache over an [`ArticleSource`].
///
/// Readers share `Arc` snapshots; the write lock is held only while a refresh
/// swaps the snapshot, so a request never observes a partially-replaced
/// table. A snapshot goes stale on TTL expiry or explicit invalidation.
pub struct TableCache {
    source: Arc<dyn ArticleSource>,
    config: CacheConfig,
    slot: RwLock<Slot>,
    loading: AtomicBool,
}

impl TableCache {
    pub fn new(source: Arc<dyn ArticleSource>, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            slot: RwLock::new(Slot::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Current snapshot, reloading first if it is missing or expired.
    pub async fn get(&self) -> Result<Arc<ArticleTable>> {
        {
            let slot = self.slot.read().await;
            if let Some(table) = slot.fresh_table(self.config.ttl) {
                return Ok(table);
            }
        }
        self.refresh().await
    }

    /// Reload from the source and swap the snapshot in.
    ///
    /// Concurrent callers serialize on the write lock; whoever enters second
    /// finds a fresh snapshot and returns it without a second load. If the
    /// load fails or times out and an older snapshot exists, that snapshot is
    /// served and stays stale; with no snapshot at all the error propagates.
    pub async fn refresh(&self) -> Result<Arc<ArticleTable>> {
        let mut slot = self.slot.write().await;
        if let Some(table) = slot.fresh_table(self.config.ttl) {
            return Ok(table);
        }

        self.loading.store(true, Ordering::SeqCst);
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.load_timeout, self.source.load()).await;
        self.loading.store(false, Ordering::SeqCst);

        let error = match outcome {
            Ok(Ok(articles)) => {
                let table = Arc::new(ArticleTable::new(articles));
                info!(
                    source = self.source.name(),
                    rows = table.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "article table loaded"
                );
                slot.table = Some(Arc::clone(&table));
                slot.loaded_at = Some(Instant::now());
                return Ok(table);
            }
            Ok(Err(e)) => e,
            Err(_) => Error::LoadTimeout(self.config.load_timeout.as_secs()),
        };

        match &slot.table {
            Some(stale) => {
                warn!(
                    source = self.source.name(),
                    error = %error,
                    "refresh failed, serving stale snapshot"
                );
                Ok(Arc::clone(stale))
            }
            None => Err(error),
        }
    }

    /// Administrative invalidation: the next `get` reloads.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.loaded_at = None;
    }

    pub async fn state(&self) -> CacheState {
        if self.loading.load(Ordering::SeqCst) {
            return CacheState::Loading;
        }
        let slot = self.slot.read().await;
        if slot.fresh_table(self.config.ttl).is_some() {
            CacheState::Fresh
        } else {
            CacheState::Stale
        }
    }
}
