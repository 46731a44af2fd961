use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::{Json, Router};
use burrow_axum::{BurrowApp, BurrowAxumError};
use burrow_core::{
    BurrowError, MemoryDirectory, MemoryPartitionStore, RoutingSelector, Tenant, TenantResolver,
    Topology, TENANT_HEADER,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> Router {
    let store = Arc::new(MemoryPartitionStore::new());
    let dir = MemoryDirectory::new(store);
    dir.create_tenant(Tenant::new("acme")).await.unwrap();

    BurrowApp::new(
        TenantResolver::new(Arc::new(dir)),
        RoutingSelector::new(Topology::single_type()),
    )
    .default_table(
        Router::new()
            .route(
                "/missing",
                get(|| async {
                    Err::<Json<Value>, _>(BurrowAxumError::from(
                        BurrowError::not_found("no such record in this partition").into_anyhow(),
                    ))
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    Err::<Json<Value>, _>(BurrowAxumError::from(anyhow::anyhow!("boom")))
                }),
            ),
    )
    .router()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn burrow_error_keeps_status_and_shape() {
    let res = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/missing")
                .header("host", "acme.example.com")
                .header(TENANT_HEADER, "acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotFound");
    assert_eq!(body["code"], 404);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("no such record"));
}

#[tokio::test]
async fn unknown_errors_map_to_a_sanitized_500() {
    let res = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/boom")
                .header("host", "acme.example.com")
                .header(TENANT_HEADER, "acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["name"], "GeneralError");
    assert!(body["message"].as_str().unwrap().contains("boom"));
}
