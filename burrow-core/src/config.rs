//! # Burrow configuration
//!
//! A minimal string key/value store, layered however the application likes.
//! Snapshots are cheap clones handed to request-scoped machinery so a running
//! request never observes a concurrent `set`.
//!
//! ## Environment overrides
//! ```bash
//! export BURROW__TENANCY__SHOW_PUBLIC_IF_NO_TENANT_FOUND=true
//! ```
//! ```rust
//! use burrow_core::BurrowConfig;
//! let mut config = BurrowConfig::new();
//! config.load_env("BURROW__"); // TENANCY__FOO → tenancy.foo
//! ```

use std::collections::HashMap;

/// When no tenant record matches the literal `public` claim: serve the
/// public partition anyway (`true`) or reject the request (`false`, default).
pub const SHOW_PUBLIC_IF_NO_TENANT_FOUND: &str = "tenancy.show_public_if_no_tenant_found";

/// Optional distinct URL table reserved for the public partition in
/// single-type deployments.
pub const PUBLIC_URL_TABLE: &str = "tenancy.public_url_table";

#[derive(Debug, Default)]
pub struct BurrowConfig {
    values: HashMap<String, String>,
}

impl BurrowConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Layer environment variables over the store. The prefix includes its
    /// trailing separator: `BURROW__TENANCY__X` with prefix `BURROW__`
    /// becomes `tenancy.x`.
    pub fn load_env(&mut self, prefix: &str) {
        for (key, value) in std::env::vars() {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> BurrowConfigSnapshot {
        BurrowConfigSnapshot::new(self.values.clone())
    }
}

/// Immutable copy of the config handed to request-scoped machinery.
#[derive(Debug, Clone, Default)]
pub struct BurrowConfigSnapshot {
    map: HashMap<String, String>,
}

impl BurrowConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut config = BurrowConfig::new();
        config.set(SHOW_PUBLIC_IF_NO_TENANT_FOUND, "true");

        assert!(config.has(SHOW_PUBLIC_IF_NO_TENANT_FOUND));
        assert_eq!(config.get(SHOW_PUBLIC_IF_NO_TENANT_FOUND), Some("true"));
    }

    #[test]
    fn snapshot_parses_bools() {
        let mut config = BurrowConfig::new();
        config.set(SHOW_PUBLIC_IF_NO_TENANT_FOUND, "true");
        config.set(PUBLIC_URL_TABLE, "public_pages");

        let snap = config.snapshot();
        assert_eq!(snap.get_bool(SHOW_PUBLIC_IF_NO_TENANT_FOUND), Some(true));
        assert_eq!(snap.get_string(PUBLIC_URL_TABLE), Some("public_pages".into()));
        assert_eq!(snap.get_bool("tenancy.missing"), None);
    }
}
