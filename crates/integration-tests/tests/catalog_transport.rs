//! Integration tests for the catalog transport and product endpoints.
//!
//! Run with: cargo test -p ng-store-integration-tests

#![allow(clippy::unwrap_used)]

use ng_store_core::{Price, ProductId, fixtures};
use ng_store_integration_tests::{StubCatalog, StubResponse, to_json};
use ng_store_storefront::catalog::{CatalogError, ProductFilters};
use ng_store_storefront::state::AppState;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn stub_with_products() -> StubCatalog {
    let stub = StubCatalog::start().await;
    stub.respond(
        "/api/v1/products",
        StubResponse::json(to_json(&vec![
            fixtures::product(1, Price::from(10)),
            fixtures::product(2, Price::from(20)),
        ])),
    );
    stub
}

// ============================================================================
// Request construction
// ============================================================================

#[tokio::test]
async fn test_list_products_without_filters() {
    let stub = stub_with_products().await;
    let state = stub.app_state();

    let products = state.products().get_products(None).await.unwrap();

    assert_eq!(products.len(), 2);
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v1/products");
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn test_empty_filters_send_same_request_as_none() {
    let stub = stub_with_products().await;
    let state = stub.app_state();

    state.products().get_products(None).await.unwrap();
    state
        .products()
        .get_products(Some(&ProductFilters::default()))
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, requests[1].path);
    assert_eq!(requests[0].query, requests[1].query);
}

#[tokio::test]
async fn test_filters_become_query_in_order() {
    let stub = stub_with_products().await;
    let state = stub.app_state();

    let filters = ProductFilters {
        category_id: Some("123".to_string()),
        category_slug: Some("electronics".to_string()),
    };
    state.products().get_products(Some(&filters)).await.unwrap();
    state
        .products()
        .get_products(Some(&ProductFilters::by_category_slug("electronics")))
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(
        requests[0].query.as_deref(),
        Some("categoryId=123&categorySlug=electronics")
    );
    assert_eq!(requests[1].query.as_deref(), Some("categorySlug=electronics"));
}

#[tokio::test]
async fn test_product_paths() {
    let stub = StubCatalog::start().await;
    let product = fixtures::product(4, Price::from(15));
    stub.respond("/api/v1/products/4", StubResponse::json(to_json(&product)));
    stub.respond(
        "/api/v1/products/slug/product-4",
        StubResponse::json(to_json(&product)),
    );
    stub.respond(
        "/api/v1/products/slug/product-4/related",
        StubResponse::json(json!([])),
    );
    let state = stub.app_state();

    let by_id = state.products().get_one(ProductId::new(4)).await.unwrap();
    let by_slug = state.products().get_one_by_slug("product-4").await.unwrap();
    let related = state
        .products()
        .get_related_products("product-4")
        .await
        .unwrap();

    assert_eq!(by_id.id, ProductId::new(4));
    assert_eq!(by_slug.slug, "product-4");
    assert_eq!(by_slug.price, Price::from(15));
    assert!(related.is_empty());

    let paths: Vec<_> = stub.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/v1/products/4",
            "/api/v1/products/slug/product-4",
            "/api/v1/products/slug/product-4/related",
        ]
    );
}

#[tokio::test]
async fn test_slug_is_encoded_as_one_segment() {
    let stub = StubCatalog::start().await;
    let state = stub.app_state();

    let _ = state.products().get_one_by_slug("a/b c").await;

    assert_eq!(stub.requests()[0].path, "/api/v1/products/slug/a%2Fb%20c");
}

#[tokio::test]
async fn test_every_request_carries_a_request_id() {
    let stub = stub_with_products().await;
    let state = stub.app_state();

    state.products().get_products(None).await.unwrap();
    state.products().get_products(None).await.unwrap();

    let ids: Vec<_> = stub
        .requests()
        .into_iter()
        .map(|r| r.request_id.unwrap())
        .collect();
    assert!(ids.iter().all(|id| uuid::Uuid::parse_str(id).is_ok()));
    assert_ne!(ids[0], ids[1]);
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_not_found_status_and_message() {
    let stub = StubCatalog::start().await;
    let state = stub.app_state();

    let err = state.products().get_one_by_slug("missing").await.unwrap_err();

    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "Not Found");
    assert!(err.is_not_found());
    assert_eq!(stub.request_count("/api/v1/products/slug/missing"), 1);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let stub = StubCatalog::start().await;
    stub.respond(
        "/api/v1/products",
        StubResponse::json_with_status(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "boom" }),
        ),
    );
    let state = stub.app_state();

    let err = state.products().get_products(None).await.unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    assert_eq!(err.message(), "Internal Server Error");
    assert_eq!(stub.request_count("/api/v1/products"), 1);
}

#[tokio::test]
async fn test_success_with_wrong_shape_is_decode_error() {
    let stub = StubCatalog::start().await;
    stub.respond(
        "/api/v1/products",
        StubResponse::json(json!({ "items": [] })),
    );
    let state = stub.app_state();

    let err = state.products().get_products(None).await.unwrap_err();

    assert!(matches!(err, CatalogError::Decode { status: 200, .. }));
}

fn state_for(addr: std::net::SocketAddr) -> AppState {
    let config = ng_store_storefront::config::StorefrontConfig::from_lookup(|key| match key {
        "NG_STORE_API_URL" => Some(format!("http://{addr}")),
        "NG_STORE_DOMAIN" => Some("https://ng-store.test".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::new(config).unwrap()
}

#[tokio::test]
async fn test_truncated_body_is_decode_error_with_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[{",
            )
            .await
            .unwrap();
        let _ = socket.shutdown().await;
    });
    let state = state_for(addr);

    let err = state.products().get_products(None).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, CatalogError::Decode { status: 200, .. }));
    assert_eq!(err.status(), 200);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let state = state_for(addr);

    let err = state.products().get_products(None).await.unwrap_err();

    assert!(matches!(err, CatalogError::Network(_)));
    assert_eq!(err.status(), 0);
}
