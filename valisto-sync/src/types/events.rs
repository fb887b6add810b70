use chrono::{DateTime, Utc};

use super::document::Document;

/// Change events broadcast by a document store.
///
/// Update events carry before and after images so trigger handlers can
/// run without a second read.
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    Created {
        collection: String,
        id: String,
        doc: Document,
        at: DateTime<Utc>,
    },
    Updated {
        collection: String,
        id: String,
        before: Document,
        after: Document,
        at: DateTime<Utc>,
    },
}

impl DocumentEvent {
    pub fn collection(&self) -> &str {
        match self {
            DocumentEvent::Created { collection, .. } => collection,
            DocumentEvent::Updated { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DocumentEvent::Created { id, .. } => id,
            DocumentEvent::Updated { id, .. } => id,
        }
    }
}
