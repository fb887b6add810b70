#[cfg(feature = "memory")]
pub mod memory;

use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;

use crate::error::StoreResult;
use crate::types::{Document, DocumentEvent};

/// Type alias for boxed streams (stable Rust compatible)
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// Data-access interface over the tenant document store.
///
/// Collections are addressed by slash paths (`tenants`,
/// `tenants/{tenantId}/productos`, ...). Implementations guarantee
/// document-level atomicity only; nothing here spans two documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if absent.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Fetch every document in a collection as `(id, document)` pairs,
    /// in document-id order.
    async fn get_collection(&self, collection: &str) -> StoreResult<Vec<(String, Document)>>;

    /// Full-replace write. Creates the document if absent.
    async fn set_document(&self, collection: &str, id: &str, doc: Document) -> StoreResult<()>;

    /// Field-level merge write. Only the given top-level keys are
    /// touched; creates the document if absent.
    async fn merge_document(&self, collection: &str, id: &str, fields: Document)
        -> StoreResult<()>;

    /// Change events for trigger delivery (boxed for stable Rust).
    fn event_stream(&self) -> BoxStream<DocumentEvent>;
}
