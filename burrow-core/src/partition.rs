//! Partition context and provisioning.
//!
//! A partition is an isolated subset of storage addressable by id (for a SQL
//! backend, a named schema). The handle here is deliberately per-request: the
//! underlying connection is a shared resource, and the only defense against a
//! reused connection leaking the previous request's partition is that every
//! request starts from a freshly-reset handle.

use std::collections::HashSet;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

/// Partition id of the default ("public") partition.
pub const PUBLIC_PARTITION: &str = "public";

/// Storage-side collaborator that can provision partitions.
///
/// Consumed by tenant creation when `auto_create_partition` is set.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Create the partition if it does not exist yet. Idempotent.
    async fn provision(&self, partition_id: &str) -> Result<()>;

    /// Whether the partition has been provisioned.
    async fn exists(&self, partition_id: &str) -> bool;
}

/// In-memory store for tests and single-process deployments. The public
/// partition always exists.
#[derive(Debug)]
pub struct MemoryPartitionStore {
    partitions: RwLock<HashSet<String>>,
}

impl MemoryPartitionStore {
    pub fn new() -> Self {
        let partitions = HashSet::from([PUBLIC_PARTITION.to_string()]);
        Self {
            partitions: RwLock::new(partitions),
        }
    }
}

impl Default for MemoryPartitionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartitionStore for MemoryPartitionStore {
    async fn provision(&self, partition_id: &str) -> Result<()> {
        self.partitions
            .write()
            .unwrap()
            .insert(partition_id.to_string());
        Ok(())
    }

    async fn exists(&self, partition_id: &str) -> bool {
        self.partitions.read().unwrap().contains(partition_id)
    }
}

/// Active-partition handle for one request.
///
/// Constructing the handle is the reset: a new context always addresses the
/// public partition. Never share one handle across concurrent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionContext {
    active: String,
}

impl PartitionContext {
    pub fn new() -> Self {
        Self {
            active: PUBLIC_PARTITION.to_string(),
        }
    }

    pub fn set_partition(&mut self, partition_id: impl Into<String>) {
        self.active = partition_id.into();
    }

    pub fn reset_to_public(&mut self) {
        self.active = PUBLIC_PARTITION.to_string();
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_public(&self) -> bool {
        self.active == PUBLIC_PARTITION
    }
}

impl Default for PartitionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_public() {
        let ctx = PartitionContext::new();
        assert!(ctx.is_public());
        assert_eq!(ctx.active(), PUBLIC_PARTITION);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ctx = PartitionContext::new();
        ctx.set_partition("acme_part");
        assert!(!ctx.is_public());

        ctx.reset_to_public();
        assert!(ctx.is_public());
        ctx.reset_to_public();
        assert!(ctx.is_public());
    }

    #[tokio::test]
    async fn memory_store_has_public_partition() {
        let store = MemoryPartitionStore::new();
        assert!(store.exists(PUBLIC_PARTITION).await);
        assert!(!store.exists("acme_part").await);

        store.provision("acme_part").await.unwrap();
        assert!(store.exists("acme_part").await);
    }
}
