//! # valisto-sync: Tenant-Scoped Inventory Synchronization
//!
//! Mirrors a tenant's deposit product stock into a single per-tenant
//! vehicle inventory snapshot document, for field/delivery use.
//!
//! Three entry points, all stateless and idempotent:
//!
//! - **user created** — seeds the snapshot from current deposit stock
//!   when a new tenant user qualifies for automatic sync
//! - **product updated** — merges that one product's stock into the
//!   snapshot, leaving every other key untouched
//! - **on demand** — full resync, requested by a client
//!
//! Storage goes through the [`DocumentStore`] trait so handlers can be
//! unit-tested against the in-memory backend instead of a live store.
//!
//! ```rust
//! use valisto_sync::{MemoryStore, SyncEngine};
//!
//! # async fn demo() -> valisto_sync::SyncResult<()> {
//! let engine = SyncEngine::new(MemoryStore::new());
//! let report = engine.sync_on_demand("tenant_123").await?;
//! println!("synced {} products", report.productos);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod store;
pub mod trigger;
pub mod types;

pub use engine::{DocumentChange, SkipReason, SyncConfig, SyncEngine, SyncOutcome, SyncReport};
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use store::{BoxStream, DocumentStore};
pub use trigger::TriggerDispatcher;
pub use types::{plan_of, stock_of, Document, DocumentEvent, VehicleSnapshot};

#[cfg(feature = "memory")]
pub use store::memory::MemoryStore;
