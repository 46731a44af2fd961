use std::sync::Arc;

use burrow_core::{RoutingSelector, TenantResolver};

/// Shared tenancy collaborators, cloned into the middleware per request.
#[derive(Clone)]
pub struct TenancyState {
    pub resolver: Arc<TenantResolver>,
    pub selector: Arc<RoutingSelector>,
}

impl TenancyState {
    pub fn new(resolver: TenantResolver, selector: RoutingSelector) -> Self {
        Self {
            resolver: Arc::new(resolver),
            selector: Arc::new(selector),
        }
    }
}
