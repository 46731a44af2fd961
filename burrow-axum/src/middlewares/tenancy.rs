use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use burrow_core::{PartitionContext, Resolution, ResolveError, TENANT_HEADER};
use serde_json::json;
use tower::{Layer, Service};

use crate::state::TenancyState;

/// Middleware that resolves the tenant for every request and switches the
/// request's partition context before any handler runs.
///
/// On success the request carries three extensions downstream: the
/// `TenantBinding` (absent on the public-fallback path), the selected
/// `UrlTableId` (absent when the default table stays), and the
/// `PartitionContext` addressing the tenant's partition. Resolution failures
/// short-circuit into well-formed responses and never reach the inner service.
#[derive(Clone)]
pub struct TenancyLayer {
    state: TenancyState,
}

impl TenancyLayer {
    pub fn new(state: TenancyState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for TenancyLayer {
    type Service = TenancyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenancyService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TenancyService<S> {
    inner: S,
    state: TenancyState,
}

impl<S> Service<Request<Body>> for TenancyService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let state = self.state.clone();

        Box::pin(async move {
            // A fresh handle per request: constructing it is the reset to
            // public, so nothing from a previous request on this connection
            // survives.
            let mut partition = PartitionContext::new();

            let host = req
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .or_else(|| req.uri().host().map(str::to_owned));
            let claim = req
                .headers()
                .get(TENANT_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            match state
                .resolver
                .resolve(&mut partition, host.as_deref(), claim.as_deref())
                .await
            {
                Ok(Resolution::Resolved(binding)) => {
                    let table = state.selector.select(Some(&binding), false);
                    tracing::debug!(
                        tenant = %binding.tenant.name,
                        partition = %partition.active(),
                        hostname = %binding.hostname,
                        "tenant resolved"
                    );
                    req.extensions_mut().insert(binding);
                    if let Some(table) = table {
                        req.extensions_mut().insert(table);
                    }
                    req.extensions_mut().insert(partition);
                    inner.call(req).await
                }
                Ok(Resolution::PublicFallback { hostname }) => {
                    let table = state.selector.select(None, true);
                    tracing::debug!(%hostname, "no tenant record matched, serving public partition");
                    if let Some(table) = table {
                        req.extensions_mut().insert(table);
                    }
                    req.extensions_mut().insert(partition);
                    inner.call(req).await
                }
                Err(err) => Ok(resolve_failure_response(err)),
            }
        })
    }
}

/// Every resolver failure becomes a well-formed response here; nothing
/// propagates past the middleware as a fault.
fn resolve_failure_response(err: ResolveError) -> Response {
    match err {
        ResolveError::BadHost => {
            tracing::warn!("rejected request with missing or untrusted host");
            StatusCode::NOT_FOUND.into_response()
        }
        ResolveError::TenantNotFound => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Tenant not found"})),
        )
            .into_response(),
        ResolveError::PublicFallbackDisabled { hostname } => {
            // The hostname stays in the log; the body is a generic not-found.
            tracing::warn!(%hostname, "public fallback disabled, no tenant for hostname");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
