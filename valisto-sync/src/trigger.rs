//! Trigger delivery: routes document change events into the sync engine.
//!
//! Handler failures are logged and swallowed. A missed sync leaves the
//! snapshot stale, which the next product update or an on-demand sync
//! repairs; rethrowing from a trigger would only feed the platform's
//! retry path.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

use crate::engine::{DocumentChange, SyncEngine, SyncOutcome};
use crate::store::{BoxStream, DocumentStore};
use crate::types::DocumentEvent;

/// Where a change event should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TriggerRoute {
    UserCreated { tenant_id: String, user_id: String },
    ProductUpdated { tenant_id: String, product_id: String },
}

/// Dispatches store change events to the sync handlers.
pub struct TriggerDispatcher<S: DocumentStore + ?Sized> {
    engine: Arc<SyncEngine<S>>,
}

impl<S: DocumentStore + ?Sized + 'static> TriggerDispatcher<S> {
    pub fn new(engine: Arc<SyncEngine<S>>) -> Self {
        Self { engine }
    }

    /// Consume a store event stream on a background task.
    pub fn spawn(self, mut events: BoxStream<DocumentEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                self.dispatch(event).await;
            }
            debug!("store event stream closed, trigger dispatcher stopping");
        })
    }

    /// Route one event. Never returns an error.
    pub async fn dispatch(&self, event: DocumentEvent) {
        let Some(route) = self.route(&event) else {
            return;
        };

        match route {
            TriggerRoute::UserCreated { tenant_id, user_id } => {
                let doc = match &event {
                    DocumentEvent::Created { doc, .. } => Some(doc),
                    _ => None,
                };
                match self
                    .engine
                    .sync_on_user_created(&tenant_id, &user_id, doc)
                    .await
                {
                    Ok(outcome) => log_outcome("user_created", &outcome),
                    Err(err) => error!(%tenant_id, %user_id, %err, "initial inventory sync failed"),
                }
            }
            TriggerRoute::ProductUpdated {
                tenant_id,
                product_id,
            } => {
                let change = match &event {
                    DocumentEvent::Updated { before, after, .. } => {
                        DocumentChange::new(Some(before.clone()), Some(after.clone()))
                    }
                    _ => DocumentChange::default(),
                };
                match self
                    .engine
                    .sync_on_product_updated(&tenant_id, &product_id, &change)
                    .await
                {
                    Ok(outcome) => log_outcome("product_updated", &outcome),
                    Err(err) => error!(%tenant_id, %product_id, %err, "stock mirror failed"),
                }
            }
        }
    }

    /// Match the event path against the trigger patterns: user creation
    /// under `tenants/{t}/<users>`, product update under
    /// `tenants/{t}/<products>`. Everything else is ignored, including
    /// the engine's own writes to the vehicle collection.
    fn route(&self, event: &DocumentEvent) -> Option<TriggerRoute> {
        let config = self.engine.config();
        let mut parts = event.collection().splitn(3, '/');
        let (root, tenant_id, sub) = (parts.next()?, parts.next()?, parts.next()?);
        if root != config.tenants_path() {
            return None;
        }

        match event {
            DocumentEvent::Created { .. } if sub == config.users_collection => {
                Some(TriggerRoute::UserCreated {
                    tenant_id: tenant_id.to_string(),
                    user_id: event.id().to_string(),
                })
            }
            DocumentEvent::Updated { .. } if sub == config.products_collection => {
                Some(TriggerRoute::ProductUpdated {
                    tenant_id: tenant_id.to_string(),
                    product_id: event.id().to_string(),
                })
            }
            _ => None,
        }
    }
}

fn log_outcome(trigger: &str, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Synced { products } => {
            info!(trigger, products = *products, "sync completed")
        }
        SyncOutcome::Skipped(reason) => debug!(trigger, ?reason, "sync skipped"),
    }
}
