//! Delayed, last-write-wins snapshot loading.
//!
//! Every range change schedules a fresh build after [`LOAD_DELAY`]. A newer
//! request aborts the pending one, and a build that still finishes after being
//! superseded is discarded by its generation number, so only the latest
//! request ever commits.

use adm_core::date_range::RangeSelection;
use adm_core::snapshot::Snapshot;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Simulated latency before a requested snapshot is committed.
pub const LOAD_DELAY: Duration = Duration::from_millis(800);

/// Builds the snapshot for a range.
pub type SnapshotBuilder = Arc<dyn Fn(RangeSelection) -> Snapshot + Send + Sync>;

/// Random snapshots ending yesterday.
pub fn default_builder() -> SnapshotBuilder {
    Arc::new(|range| {
        let mut rng = StdRng::from_entropy();
        Snapshot::generate(range, Local::now().date_naive(), &mut rng)
    })
}

struct Shared {
    current: Mutex<Option<Arc<Snapshot>>>,
    generation: AtomicU64,
    loading: AtomicBool,
}

impl Shared {
    /// Store `snapshot` if `generation` is still the latest request.
    fn commit(&self, generation: u64, snapshot: Arc<Snapshot>) -> bool {
        let mut current = match self.current.lock() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("discarding superseded {} snapshot (request {})", snapshot.range, generation);
            return false;
        }
        log::info!(
            "committed {} snapshot: {} days, {} campaigns",
            snapshot.range,
            snapshot.revenue.len(),
            snapshot.campaigns.len()
        );
        *current = Some(snapshot);
        self.loading.store(false, Ordering::SeqCst);
        true
    }
}

pub struct SnapshotLoader {
    shared: Arc<Shared>,
    pending: Mutex<Option<JoinHandle<()>>>,
    builder: SnapshotBuilder,
    delay: Duration,
}

impl SnapshotLoader {
    pub fn new(builder: SnapshotBuilder, delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: Mutex::new(None),
                generation: AtomicU64::new(0),
                loading: AtomicBool::new(false),
            }),
            pending: Mutex::new(None),
            builder,
            delay,
        }
    }

    /// Schedule a build for `range`, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, range: RangeSelection) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.loading.store(true, Ordering::SeqCst);

        let shared = self.shared.clone();
        let builder = self.builder.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.commit(generation, Arc::new(builder(range)));
        });

        let mut pending = self.lock_pending();
        if let Some(previous) = pending.replace(task) {
            if !previous.is_finished() {
                log::debug!("superseding pending snapshot load with {} (request {})", range, generation);
            }
            previous.abort();
        }
    }

    /// Build and commit `range` right away, superseding anything pending.
    pub fn load_now(&self, range: RangeSelection) -> Arc<Snapshot> {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
        let snapshot = Arc::new((self.builder)(range));
        self.shared.commit(generation, snapshot.clone());
        snapshot
    }

    /// Wait for the pending load, if any, to finish or be cancelled.
    pub async fn settle(&self) {
        let task = self.lock_pending().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("snapshot load task failed: {}", e);
                }
            }
        }
    }

    /// The last committed snapshot.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        match self.shared.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// Abort any pending load. Idempotent.
    pub fn cancel(&self) {
        if let Some(task) = self.lock_pending().take() {
            task.abort();
            self.shared.loading.store(false, Ordering::SeqCst);
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for SnapshotLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}
