use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use burrow_core::{RoutingSelector, TenantResolver, UrlTableId};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::Service;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middlewares::tenancy::TenancyLayer;
use crate::TenancyState;

/// Application builder: URL tables keyed by id, a default table, and the
/// tenancy middleware wired around dispatch.
pub struct BurrowApp {
    state: TenancyState,
    tables: HashMap<UrlTableId, Router>,
    default_table: Router,
}

impl BurrowApp {
    pub fn new(resolver: TenantResolver, selector: RoutingSelector) -> Self {
        Self {
            state: TenancyState::new(resolver, selector),
            tables: HashMap::new(),
            default_table: Router::new(),
        }
    }

    /// Mount a URL table under an id the topology can select.
    pub fn table(mut self, id: impl Into<String>, router: Router) -> Self {
        self.tables.insert(UrlTableId::new(id), router);
        self
    }

    /// The table used when selection leaves the default in effect.
    pub fn default_table(mut self, router: Router) -> Self {
        self.default_table = router;
        self
    }

    /// Build the serveable router: request-id and trace layers outermost,
    /// then tenant resolution, then table dispatch.
    pub fn router(self) -> Router {
        let dispatcher = Dispatcher {
            tables: Arc::new(self.tables),
            default_table: self.default_table,
        };

        Router::new()
            .fallback_service(dispatcher)
            .layer(TenancyLayer::new(self.state))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Request dispatcher: executes the handler chain of whichever URL table the
/// selector chose; requests with no selected table fall through to the
/// default table.
#[derive(Clone)]
pub struct Dispatcher {
    tables: Arc<HashMap<UrlTableId, Router>>,
    default_table: Router,
}

impl Service<Request<Body>> for Dispatcher {
    type Response = Response;
    type Error = Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut router = req
            .extensions()
            .get::<UrlTableId>()
            .and_then(|id| self.tables.get(id))
            .cloned()
            .unwrap_or_else(|| self.default_table.clone());

        Box::pin(async move { router.call(req).await })
    }
}
