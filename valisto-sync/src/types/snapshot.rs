//! The per-tenant vehicle inventory snapshot document.
//!
//! Product ids sit at the top level of the document, mapped to stock
//! counts, next to a handful of reserved metadata keys. Readers must
//! skip the reserved keys to recover the stock mapping.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use valisto_core::Plan;

use super::document::{numeric, Document};

pub const KEY_UPDATED_AT: &str = "updatedAt";
pub const KEY_FECHA: &str = "fecha";
pub const KEY_AUTO_SYNCED: &str = "sincronizadoAutomaticamente";
pub const KEY_MANUAL_SYNCED: &str = "sincronizadoManualmente";
pub const KEY_PLAN: &str = "plan";
pub const KEY_INITIALIZED_BY: &str = "inicializadoPor";

const RESERVED_KEYS: [&str; 6] = [
    KEY_UPDATED_AT,
    KEY_FECHA,
    KEY_AUTO_SYNCED,
    KEY_MANUAL_SYNCED,
    KEY_PLAN,
    KEY_INITIALIZED_BY,
];

/// Builder for vehicle snapshot writes.
///
/// Full syncs render the entire document; the single-product merge path
/// renders a one-entry mapping plus refreshed metadata.
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    pub stock: BTreeMap<String, i64>,
    pub plan: Plan,
    pub manual: bool,
    pub initialized_by: Option<String>,
    pub at: DateTime<Utc>,
}

impl VehicleSnapshot {
    pub fn new(stock: BTreeMap<String, i64>, plan: Plan) -> Self {
        Self {
            stock,
            plan,
            manual: false,
            initialized_by: None,
            at: Utc::now(),
        }
    }

    /// Mark this write as manually requested (on-demand sync).
    pub fn manual(mut self) -> Self {
        self.manual = true;
        self
    }

    /// Record the user whose creation seeded the snapshot.
    pub fn initialized_by(mut self, user_id: impl Into<String>) -> Self {
        self.initialized_by = Some(user_id.into());
        self
    }

    /// Render the snapshot document: product ids at the top level plus
    /// reserved metadata keys.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (product_id, stock) in &self.stock {
            doc.insert(product_id.clone(), Value::from(*stock));
        }
        let at = self.at.to_rfc3339();
        doc.insert(KEY_UPDATED_AT.to_string(), Value::from(at.clone()));
        doc.insert(KEY_FECHA.to_string(), Value::from(at));
        doc.insert(KEY_AUTO_SYNCED.to_string(), Value::from(true));
        if self.manual {
            doc.insert(KEY_MANUAL_SYNCED.to_string(), Value::from(true));
        }
        doc.insert(KEY_PLAN.to_string(), Value::from(self.plan.label()));
        if let Some(user_id) = &self.initialized_by {
            doc.insert(KEY_INITIALIZED_BY.to_string(), Value::from(user_id.clone()));
        }
        doc
    }
}

/// Extract the product id → stock mapping from a snapshot document,
/// skipping reserved metadata keys.
pub fn snapshot_stock(doc: &Document) -> BTreeMap<String, i64> {
    doc.iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| numeric(value).map(|n| (key.clone(), n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_stock_past_metadata() {
        let mut stock = BTreeMap::new();
        stock.insert("p1".to_string(), 5);
        stock.insert("p2".to_string(), 0);
        let doc = VehicleSnapshot::new(stock.clone(), Plan::Individual)
            .manual()
            .to_document();

        assert_eq!(doc[KEY_AUTO_SYNCED], Value::from(true));
        assert_eq!(doc[KEY_MANUAL_SYNCED], Value::from(true));
        assert_eq!(doc[KEY_PLAN], Value::from("individual"));
        assert!(doc.contains_key(KEY_UPDATED_AT));
        assert!(doc.contains_key(KEY_FECHA));
        assert_eq!(snapshot_stock(&doc), stock);
    }

    #[test]
    fn automatic_writes_omit_the_manual_flag() {
        let doc = VehicleSnapshot::new(BTreeMap::new(), Plan::Unknown).to_document();
        assert!(!doc.contains_key(KEY_MANUAL_SYNCED));
        assert_eq!(doc[KEY_PLAN], Value::from("individual"));
    }
}
