//! Tenant resolution.
//!
//! The per-request state machine: reset the partition context to public,
//! normalize the request host, look up the tenant claim, then either switch
//! the partition to the matched tenant, fall back to the public partition, or
//! fail with a terminal error the HTTP layer converts to a response.

use std::sync::Arc;

use crate::config::{BurrowConfigSnapshot, SHOW_PUBLIC_IF_NO_TENANT_FOUND};
use crate::directory::TenantDirectory;
use crate::partition::PartitionContext;
use crate::tenant::TenantBinding;

/// Request header carrying the tenant claim.
pub const TENANT_HEADER: &str = "Tenant-Header";

/// Literal claim that requests the public partition.
pub const PUBLIC_CLAIM: &str = "public";

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A tenant matched the claim; the partition context now addresses its
    /// partition.
    Resolved(TenantBinding),
    /// The claim was the literal `public` and the fallback policy allows it.
    /// The partition context stays public and routing is forced public.
    PublicFallback { hostname: String },
}

/// Terminal resolution failures. Each maps to a well-formed response; none
/// propagates as a fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The request host is missing or untrusted. Surfaces as a generic 404.
    #[error("request host is missing or not trusted")]
    BadHost,
    /// The claim named no known tenant. Surfaces as a structured 400.
    #[error("tenant not found")]
    TenantNotFound,
    /// The claim was `public` but the deployment forbids silent fallback.
    /// Surfaces as a generic 404; the hostname stays in logs.
    #[error("no tenant for hostname \"{hostname}\"")]
    PublicFallbackDisabled { hostname: String },
}

/// Normalize a host value: lower-case, drop the port suffix, drop one leading
/// `www.` label. Returns `None` for hosts that cannot be trusted. Idempotent
/// on already-normalized input.
pub fn normalize_hostname(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let host = lowered.split(':').next().unwrap_or("");
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return None;
    }
    Some(host.to_string())
}

/// Decides which tenant a request belongs to and switches the partition
/// context accordingly, before any handler runs.
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    show_public_if_no_tenant_found: bool,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            directory,
            show_public_if_no_tenant_found: false,
        }
    }

    /// Read the fallback policy from config.
    pub fn from_config(directory: Arc<dyn TenantDirectory>, config: &BurrowConfigSnapshot) -> Self {
        Self::new(directory).show_public_if_no_tenant_found(
            config
                .get_bool(SHOW_PUBLIC_IF_NO_TENANT_FOUND)
                .unwrap_or(false),
        )
    }

    pub fn show_public_if_no_tenant_found(mut self, show: bool) -> Self {
        self.show_public_if_no_tenant_found = show;
        self
    }

    /// Resolve one request.
    ///
    /// The partition context is reset to public first, whatever happens next:
    /// a reused connection must never carry the previous request's partition
    /// forward. The claim lookup is case-insensitive; the `public` fallback
    /// branch matches the literal claim only after the lookup misses.
    pub async fn resolve(
        &self,
        partition: &mut PartitionContext,
        host: Option<&str>,
        claim: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        partition.reset_to_public();

        let hostname = host
            .and_then(normalize_hostname)
            .ok_or(ResolveError::BadHost)?;

        let tenant = match claim {
            Some(claim) => self.directory.find_tenant_by_name(claim).await,
            None => None,
        };

        match tenant {
            Some(tenant) => {
                partition.set_partition(tenant.partition_id.clone());
                Ok(Resolution::Resolved(TenantBinding::new(tenant, hostname)))
            }
            None if claim == Some(PUBLIC_CLAIM) => {
                if self.show_public_if_no_tenant_found {
                    Ok(Resolution::PublicFallback { hostname })
                } else {
                    Err(ResolveError::PublicFallbackDisabled { hostname })
                }
            }
            None => Err(ResolveError::TenantNotFound),
        }
    }
}
