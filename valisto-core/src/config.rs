//! # VaListo Configuration
//!
//! A minimal, framework-agnostic configuration system based on a simple
//! string key/value store. Applications layer configuration however they
//! like: defaults first, then a deployment file, then environment
//! overrides via [`ValistoConfig::load_env`].
//!
//! ## Setting and reading values
//! ```rust
//! use valisto_core::ValistoConfig;
//! let mut config = ValistoConfig::new();
//!
//! config.set("sync.products_collection", "productos");
//!
//! assert_eq!(config.get("sync.products_collection"), Some("productos"));
//! ```
//!
//! ## Environment overrides
//! `load_env` reads every variable with the given prefix and normalizes
//! `__` into `.`:
//!
//! ```bash
//! export VALISTO__SYNC__VEHICLE_DOC_ID=actual
//! ```
//!
//! Higher-level loaders (TOML, JSON, Consul, Vault, etc.) are
//! intentionally kept out so each deployment remains free to choose its
//! configuration strategy.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ValistoConfig {
    values: HashMap<String, String>,
}

impl ValistoConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    ///
    /// Example: config.set("sync.vehicle_doc_id", "actual")
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    ///
    /// Returns None if the key is not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay environment variables with the given prefix.
    ///
    /// `VALISTO__SYNC__VEHICLE_DOC_ID` → `sync.vehicle_doc_id`
    pub fn load_env(&mut self, prefix: &str) {
        for (key, value) in std::env::vars() {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(self.values.clone())
    }
}

/// Immutable view of a config store, cheap to clone and hand to services.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    map: HashMap<String, String>,
}

impl ConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut config = ValistoConfig::new();
        config.set("sync.users_collection", "usuarios");
        assert_eq!(config.get("sync.users_collection"), Some("usuarios"));
        assert!(config.has("sync.users_collection"));
        assert!(!config.has("sync.other"));
    }

    #[test]
    fn snapshot_exposes_typed_getters() {
        let mut config = ValistoConfig::new();
        config.set("server.port", "8080");
        config.set("server.trace", "true");
        let snap = config.snapshot();
        assert_eq!(snap.get_usize("server.port"), Some(8080));
        assert_eq!(snap.get_bool("server.trace"), Some(true));
        assert_eq!(snap.get_usize("server.trace"), None);
    }

    #[test]
    fn load_env_normalizes_keys() {
        std::env::set_var("VALISTO_TEST__SYNC__VEHICLE_DOC_ID", "actual");
        let mut config = ValistoConfig::new();
        config.load_env("VALISTO_TEST__");
        assert_eq!(config.get("sync.vehicle_doc_id"), Some("actual"));
        std::env::remove_var("VALISTO_TEST__SYNC__VEHICLE_DOC_ID");
    }
}
