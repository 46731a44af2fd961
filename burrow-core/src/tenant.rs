//! Core tenant types for Burrow.

use serde::{Deserialize, Serialize};

/// One isolated customer of the system.
///
/// The record is immutable once created. Request-scoped information (the
/// hostname a request arrived on) lives on [`TenantBinding`], never on the
/// tenant itself, so one tenant value can be shared freely across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique under case-insensitive comparison.
    pub name: String,
    /// Identifier of the tenant's isolated data partition.
    pub partition_id: String,
    /// When true, the partition is provisioned when the tenant is created.
    pub auto_create_partition: bool,
    /// Only meaningful in multi-type topologies.
    pub tenant_type: Option<String>,
}

impl Tenant {
    /// Create a tenant whose partition id is the lower-cased name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        let partition_id = name.to_lowercase();
        Self {
            name,
            partition_id,
            auto_create_partition: true,
            tenant_type: None,
        }
    }

    /// Override the derived partition id.
    pub fn with_partition_id(mut self, partition_id: impl Into<String>) -> Self {
        self.partition_id = partition_id.into();
        self
    }

    pub fn with_tenant_type(mut self, tenant_type: impl Into<String>) -> Self {
        self.tenant_type = Some(tenant_type.into());
        self
    }

    /// Opt out of automatic partition provisioning on creation.
    pub fn manual_partition(mut self) -> Self {
        self.auto_create_partition = false;
        self
    }
}

/// Maps a hostname to a tenant. Many domains may point at one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub hostname: String,
    pub tenant_name: String,
}

/// Request-scoped association of a resolved tenant and the normalized
/// hostname the request arrived on.
///
/// Created by the resolver, carried through request extensions, dropped when
/// the request ends. The hostname is diagnostic only; routing never consults
/// it on the header-based path.
#[derive(Debug, Clone)]
pub struct TenantBinding {
    pub tenant: Tenant,
    pub hostname: String,
}

impl TenantBinding {
    pub fn new(tenant: Tenant, hostname: impl Into<String>) -> Self {
        Self {
            tenant,
            hostname: hostname.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_id_defaults_to_lowercased_name() {
        let tenant = Tenant::new("Acme");
        assert_eq!(tenant.partition_id, "acme");
        assert!(tenant.auto_create_partition);
        assert!(tenant.tenant_type.is_none());
    }

    #[test]
    fn partition_id_can_be_overridden() {
        let tenant = Tenant::new("acme").with_partition_id("acme_part");
        assert_eq!(tenant.partition_id, "acme_part");
    }
}
