use std::sync::Arc;
use tokio::sync::Mutex;
use vigil_extract::AdvisoryExtractor;
use vigil_store::DocumentStore;

/// Shared state handed to every route handler and the scheduler.
///
/// Constructed once at startup and cloned per consumer; there is no
/// ambient global. `sync_gate` serializes extract-then-sync cycles so the
/// timer and `/force-sync` can never interleave their check-then-write
/// batches.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn AdvisoryExtractor>,
    pub store: Arc<dyn DocumentStore>,
    pub collection: String,
    pub sync_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        extractor: Arc<dyn AdvisoryExtractor>,
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            store,
            collection: collection.into(),
            sync_gate: Arc::new(Mutex::new(())),
        }
    }
}
