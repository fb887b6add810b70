use std::sync::Arc;

use valisto_sync::{DocumentStore, SyncEngine};

pub struct ValistoAxumState<S>
where
    S: DocumentStore + ?Sized + 'static,
{
    pub engine: Arc<SyncEngine<S>>,
}

impl<S> Clone for ValistoAxumState<S>
where
    S: DocumentStore + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S> ValistoAxumState<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(engine: SyncEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
