//! Deduplicating sync of extracted records into the document store.

use crate::state::AppState;
use tracing::{debug, info, warn};
use vigil_common::AdvisoryRecord;
use vigil_extract::ExtractError;
use vigil_store::DocumentStore;

/// Write every record the store has not seen; returns how many were new.
///
/// Per-record failures are logged and skipped so one bad document cannot
/// abort the batch. Existing documents are never touched: this is an
/// at-most-one-write-per-identifier policy, append-only by construction.
pub async fn sync_records(
    store: &dyn DocumentStore,
    collection: &str,
    records: &[AdvisoryRecord],
) -> usize {
    let mut written = 0usize;
    for record in records {
        if record.title.trim().is_empty() {
            continue;
        }
        let id = record.alert_id();

        match store.exists(collection, &id).await {
            Ok(true) => {
                debug!(target: "sync", id = %id, "sync.already_present");
            }
            Ok(false) => {
                let doc = match serde_json::to_value(record) {
                    Ok(doc) => doc,
                    Err(err) => {
                        warn!(target: "sync", id = %id, error = %err, "sync.encode_failed");
                        continue;
                    }
                };
                match store.set(collection, &id, &doc).await {
                    Ok(()) => {
                        written += 1;
                        info!(
                            target: "sync",
                            id = %id,
                            title = %record.title,
                            "sync.document_written"
                        );
                    }
                    Err(err) => {
                        warn!(target: "sync", id = %id, error = %err, "sync.write_failed");
                    }
                }
            }
            Err(err) => {
                warn!(target: "sync", id = %id, error = %err, "sync.lookup_failed");
            }
        }
    }

    info!(
        target: "sync",
        processed = records.len(),
        written,
        "sync.batch_complete"
    );
    written
}

/// One extract-then-sync pass, holding the gate so cycles never overlap.
///
/// An extraction failure aborts the cycle before any store traffic; the
/// caller decides whether that is a log line (scheduler) or part of a
/// response (manual sync).
pub async fn run_sync_cycle(state: &AppState) -> Result<usize, ExtractError> {
    let _gate = state.sync_gate.lock().await;

    let records = state.extractor.extract().await?;
    info!(
        target: "sync",
        records = records.len(),
        "sync.extraction_complete"
    );

    Ok(sync_records(state.store.as_ref(), &state.collection, &records).await)
}
