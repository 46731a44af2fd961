//! URL-table selection.
//!
//! After resolution, dispatch needs to know which URL table governs the rest
//! of the request. Selection never fails: `None` simply means the default
//! table stays in effect.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::config::{BurrowConfigSnapshot, PUBLIC_URL_TABLE};
use crate::partition::PUBLIC_PARTITION;
use crate::tenant::TenantBinding;

/// Identifier of a mounted URL table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlTableId(pub String);

impl UrlTableId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UrlTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deployment topology: how tenants map to URL tables.
#[derive(Debug, Clone)]
pub enum Topology {
    /// All tenants share the default table; the public partition may get a
    /// distinct one.
    SingleType { public_table: Option<UrlTableId> },
    /// Tenants are grouped into types, each with its own table. Well-formed
    /// deployments include an entry for the public type (keyed `public`).
    MultiType { tables: HashMap<String, UrlTableId> },
}

impl Topology {
    pub fn single_type() -> Self {
        Topology::SingleType { public_table: None }
    }

    pub fn single_type_with_public(table: UrlTableId) -> Self {
        Topology::SingleType {
            public_table: Some(table),
        }
    }

    pub fn multi_type(tables: HashMap<String, UrlTableId>) -> Self {
        Topology::MultiType { tables }
    }

    /// Single-type topology from config; the optional public table comes
    /// from `tenancy.public_url_table`.
    pub fn single_type_from_config(config: &BurrowConfigSnapshot) -> Self {
        Topology::SingleType {
            public_table: config.get_string(PUBLIC_URL_TABLE).map(UrlTableId),
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::single_type()
    }
}

/// Chooses the URL table governing dispatch for a resolved request, and keeps
/// the process-wide "current table" indicator reverse-URL generation reads.
pub struct RoutingSelector {
    topology: Topology,
    current: RwLock<Option<UrlTableId>>,
}

impl RoutingSelector {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            current: RwLock::new(None),
        }
    }

    /// Select the table for a request. `None` leaves the default table in
    /// effect; a missing mapping degrades the same way.
    pub fn select(&self, binding: Option<&TenantBinding>, force_public: bool) -> Option<UrlTableId> {
        match &self.topology {
            Topology::MultiType { tables } => match binding {
                None => tables.get(PUBLIC_PARTITION).cloned(),
                Some(b) if force_public || b.tenant.partition_id == PUBLIC_PARTITION => {
                    tables.get(PUBLIC_PARTITION).cloned()
                }
                Some(b) => {
                    let table = b
                        .tenant
                        .tenant_type
                        .as_deref()
                        .and_then(|t| tables.get(t))
                        .cloned();
                    if let Some(table) = &table {
                        *self.current.write().unwrap() = Some(table.clone());
                    }
                    table
                }
            },
            Topology::SingleType { public_table } => {
                let public = force_public
                    || binding.is_some_and(|b| b.tenant.partition_id == PUBLIC_PARTITION);
                if public {
                    public_table.clone()
                } else {
                    None
                }
            }
        }
    }

    /// Table reverse-URL generation should resolve against, if any tenant-type
    /// selection has happened.
    pub fn current_url_table(&self) -> Option<UrlTableId> {
        self.current.read().unwrap().clone()
    }
}
