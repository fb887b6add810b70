use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use valisto_sync::{DocumentStore, SyncEngine};

use crate::callable;
use crate::ValistoAxumState;

pub struct ValistoApp<S>
where
    S: DocumentStore + ?Sized + 'static,
{
    pub engine: Arc<SyncEngine<S>>,
    pub router: Router<()>,
}

impl<S> Clone for ValistoApp<S>
where
    S: DocumentStore + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            router: self.router.clone(),
        }
    }
}

impl<S> ValistoApp<S>
where
    S: DocumentStore + ?Sized + 'static,
{
    pub fn new(engine: SyncEngine<S>) -> Self
    where
        S: Sized,
    {
        Self::from_arc(Arc::new(engine))
    }

    pub fn from_arc(engine: Arc<SyncEngine<S>>) -> Self {
        let state = ValistoAxumState {
            engine: Arc::clone(&engine),
        };
        let x_request_id = HeaderName::from_static("x-request-id");
        let router = callable::callable_router(state)
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));
        Self { engine, router }
    }

    pub fn use_router(mut self, path: &str, router: Router<()>) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "valisto listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

pub fn axum<S>(engine: SyncEngine<S>) -> ValistoApp<S>
where
    S: DocumentStore + 'static,
{
    ValistoApp::new(engine)
}
