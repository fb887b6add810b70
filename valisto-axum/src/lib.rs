//! Library template created with FerrisUp

//! valisto-axum: Axum adapter for VaListo.
//!
//! Exposes the callable inventory sync endpoint over HTTP and maps
//! structured errors onto JSON responses.

pub mod app;
pub mod callable;
pub mod state;
mod error;
pub use error::ValistoAxumError;
pub use state::ValistoAxumState;

pub use app::{axum, ValistoApp};
pub use callable::{callable_router, SyncRequest, SyncResponse};
