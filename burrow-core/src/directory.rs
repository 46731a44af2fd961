//! Tenant directory: lookup and lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::errors::{BurrowError, BurrowResult};
use crate::partition::{PartitionStore, PUBLIC_PARTITION};
use crate::tenant::{Domain, Tenant};

/// Lookup interface the resolver consumes. Real deployments back this with a
/// persistent store; `MemoryDirectory` serves tests and single-process use.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Case-insensitive lookup by tenant name.
    async fn find_tenant_by_name(&self, name: &str) -> Option<Tenant>;

    /// Lookup through domain records, for host-based resolution flows.
    async fn find_tenant_by_hostname(&self, hostname: &str) -> Option<Tenant>;
}

struct DirectoryInner {
    /// Keyed by lower-cased tenant name.
    tenants: HashMap<String, Tenant>,
    /// hostname → lower-cased tenant name.
    domains: HashMap<String, String>,
}

/// In-memory tenant directory.
pub struct MemoryDirectory {
    inner: RwLock<DirectoryInner>,
    store: Arc<dyn PartitionStore>,
}

impl MemoryDirectory {
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self {
            inner: RwLock::new(DirectoryInner {
                tenants: HashMap::new(),
                domains: HashMap::new(),
            }),
            store,
        }
    }

    /// Register a tenant, provisioning its partition when the record asks
    /// for it.
    ///
    /// The name `public` is reserved: public requests are governed by the
    /// resolver's fallback policy, not a directory row.
    pub async fn create_tenant(&self, tenant: Tenant) -> BurrowResult<Tenant> {
        let key = tenant.name.to_lowercase();
        if key == PUBLIC_PARTITION {
            return Err(
                BurrowError::bad_request("\"public\" is a reserved tenant name").into_anyhow(),
            );
        }

        {
            let mut inner = self.inner.write().unwrap();
            if inner.tenants.contains_key(&key) {
                return Err(BurrowError::conflict(format!(
                    "tenant already exists: {}",
                    tenant.name
                ))
                .into_anyhow());
            }
            inner.tenants.insert(key.clone(), tenant.clone());
        }

        if tenant.auto_create_partition {
            if let Err(e) = self.store.provision(&tenant.partition_id).await {
                self.inner.write().unwrap().tenants.remove(&key);
                return Err(e);
            }
        }

        Ok(tenant)
    }

    /// Point a hostname at an existing tenant. Hostnames are stored
    /// lower-cased; re-adding a hostname moves it.
    pub async fn add_domain(&self, hostname: &str, tenant_name: &str) -> BurrowResult<Domain> {
        let key = tenant_name.to_lowercase();
        let hostname = hostname.to_lowercase();

        let mut inner = self.inner.write().unwrap();
        if !inner.tenants.contains_key(&key) {
            return Err(
                BurrowError::not_found(format!("no tenant named {tenant_name}")).into_anyhow(),
            );
        }
        inner.domains.insert(hostname.clone(), key.clone());

        Ok(Domain {
            hostname,
            tenant_name: key,
        })
    }
}

#[async_trait]
impl TenantDirectory for MemoryDirectory {
    async fn find_tenant_by_name(&self, name: &str) -> Option<Tenant> {
        let inner = self.inner.read().unwrap();
        inner.tenants.get(&name.to_lowercase()).cloned()
    }

    async fn find_tenant_by_hostname(&self, hostname: &str) -> Option<Tenant> {
        let inner = self.inner.read().unwrap();
        let key = inner.domains.get(&hostname.to_lowercase())?;
        inner.tenants.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::MemoryPartitionStore;

    fn directory() -> (MemoryDirectory, Arc<MemoryPartitionStore>) {
        let store = Arc::new(MemoryPartitionStore::new());
        (MemoryDirectory::new(store.clone()), store)
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let (dir, _) = directory();
        dir.create_tenant(Tenant::new("Acme")).await.unwrap();

        for name in ["acme", "ACME", "aCmE"] {
            let found = dir.find_tenant_by_name(name).await.unwrap();
            assert_eq!(found.name, "Acme");
        }
        assert!(dir.find_tenant_by_name("globex").await.is_none());
    }

    #[tokio::test]
    async fn creation_provisions_partition() {
        let (dir, store) = directory();
        dir.create_tenant(Tenant::new("acme").with_partition_id("acme_part"))
            .await
            .unwrap();
        assert!(store.exists("acme_part").await);
    }

    #[tokio::test]
    async fn manual_partition_skips_provisioning() {
        let (dir, store) = directory();
        dir.create_tenant(Tenant::new("acme").manual_partition())
            .await
            .unwrap();
        assert!(!store.exists("acme").await);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_across_casings() {
        let (dir, _) = directory();
        dir.create_tenant(Tenant::new("acme")).await.unwrap();

        let err = dir.create_tenant(Tenant::new("ACME")).await.unwrap_err();
        let burrow = BurrowError::from_anyhow(&err).unwrap();
        assert_eq!(burrow.code(), 409);
    }

    #[tokio::test]
    async fn public_name_is_reserved() {
        let (dir, _) = directory();
        let err = dir.create_tenant(Tenant::new("Public")).await.unwrap_err();
        let burrow = BurrowError::from_anyhow(&err).unwrap();
        assert_eq!(burrow.code(), 400);
    }

    #[tokio::test]
    async fn domains_resolve_to_their_tenant() {
        let (dir, _) = directory();
        dir.create_tenant(Tenant::new("acme")).await.unwrap();
        dir.add_domain("Shop.Example.com", "acme").await.unwrap();

        let found = dir.find_tenant_by_hostname("shop.example.com").await.unwrap();
        assert_eq!(found.name, "acme");
        assert!(dir.find_tenant_by_hostname("other.example.com").await.is_none());
    }

    #[tokio::test]
    async fn domain_requires_existing_tenant() {
        let (dir, _) = directory();
        let err = dir.add_domain("shop.example.com", "ghost").await.unwrap_err();
        let burrow = BurrowError::from_anyhow(&err).unwrap();
        assert_eq!(burrow.code(), 404);
    }
}
