pub mod document;
pub mod events;
pub mod snapshot;

pub use document::{plan_of, stock_of, Document};
pub use events::DocumentEvent;
pub use snapshot::{snapshot_stock, VehicleSnapshot};
