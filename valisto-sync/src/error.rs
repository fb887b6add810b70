use thiserror::Error;
use valisto_core::Plan;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure errors surfaced by a document store backend
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures surfaced by the sync engine.
///
/// Trigger adapters log these and move on; the callable path maps them
/// onto client-visible structured errors.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("Missing required field: tenantId")]
    MissingTenantId,

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("No user found for tenant: {0}")]
    UserNotFound(String),

    #[error("Plan not eligible for inventory sync: {0}")]
    PlanNotEligible(Plan),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
