//! Remote document store contract and its implementations.
//!
//! [`DocumentStore`] is the seam the sync path programs against: a store
//! addressable by `(collection, document id)` with `exists`, `get`, and
//! `set`. [`FirestoreStore`] speaks the Firestore REST API through the
//! HTTP plumbing in [`http`]; [`MemoryStore`] keeps everything in-process
//! for tests and dry runs.

pub mod firestore;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use firestore::FirestoreStore;
pub use http::{HttpClient, HttpError};
pub use memory::MemoryStore;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The document could not be mapped to or from the wire shape.
    #[error("unsupported document shape: {0}")]
    Document(String),
}

/// A document store addressable by `(collection, document id)`.
///
/// The sync path only ever checks existence and writes absent documents;
/// nothing in this system updates or deletes stored documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError>;
}
