use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::error::StoreResult;
use crate::store::{BoxStream, DocumentStore};
use crate::types::{Document, DocumentEvent};

// collection path -> document id -> document
type Collections = HashMap<String, BTreeMap<String, Document>>;

/// In-memory backend for testing and development
#[derive(Clone)]
pub struct MemoryStore {
    pub(crate) collections: Arc<RwLock<Collections>>,

    /// Change broadcaster for trigger delivery
    pub(crate) event_broadcaster: broadcast::Sender<DocumentEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (event_broadcaster, _) = broadcast::channel(1024);

        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            event_broadcaster,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn get_collection(&self, collection: &str) -> StoreResult<Vec<(String, Document)>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_document(&self, collection: &str, id: &str, doc: Document) -> StoreResult<()> {
        let before = {
            let mut collections = self.collections.write();
            let docs = collections.entry(collection.to_string()).or_default();
            docs.insert(id.to_string(), doc.clone())
        };

        let event = match before {
            Some(before) => DocumentEvent::Updated {
                collection: collection.to_string(),
                id: id.to_string(),
                before,
                after: doc,
                at: Utc::now(),
            },
            None => DocumentEvent::Created {
                collection: collection.to_string(),
                id: id.to_string(),
                doc,
                at: Utc::now(),
            },
        };
        let _ = self.event_broadcaster.send(event);

        Ok(())
    }

    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<()> {
        let (before, after) = {
            let mut collections = self.collections.write();
            let docs = collections.entry(collection.to_string()).or_default();
            match docs.get_mut(id) {
                Some(doc) => {
                    let before = doc.clone();
                    for (key, value) in fields {
                        doc.insert(key, value);
                    }
                    (Some(before), doc.clone())
                }
                None => {
                    docs.insert(id.to_string(), fields.clone());
                    (None, fields)
                }
            }
        };

        let event = match before {
            Some(before) => DocumentEvent::Updated {
                collection: collection.to_string(),
                id: id.to_string(),
                before,
                after,
                at: Utc::now(),
            },
            None => DocumentEvent::Created {
                collection: collection.to_string(),
                id: id.to_string(),
                doc: after,
                at: Utc::now(),
            },
        };
        let _ = self.event_broadcaster.send(event);

        Ok(())
    }

    fn event_stream(&self) -> BoxStream<DocumentEvent> {
        let receiver = self.event_broadcaster.subscribe();
        use tokio_stream::{wrappers::BroadcastStream, StreamExt};
        let stream = BroadcastStream::new(receiver).filter_map(|result| result.ok());

        Box::pin(stream)
    }
}
