//! Integration tests for the two category fetch strategies.
//!
//! The transport path fails on any non-success status. The raw path parses
//! whatever JSON body comes back and only fails on network or JSON errors.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use ng_store_core::fixtures;
use ng_store_integration_tests::{StubCatalog, StubResponse, to_json};
use ng_store_storefront::catalog::{CategoryFetcher, RawCategories, RawFetchError};
use ng_store_storefront::state::AppState;
use serde_json::json;

const CATEGORIES: &str = "/api/v1/categories";

async fn fetch_names<F: CategoryFetcher>(fetcher: &F) -> Result<Vec<String>, F::Error> {
    let categories = fetcher.fetch_categories().await?;
    Ok(categories.into_iter().map(|c| c.name).collect())
}

#[tokio::test]
async fn test_both_paths_agree_on_success() {
    let stub = StubCatalog::start().await;
    stub.respond(
        CATEGORIES,
        StubResponse::json(to_json(&vec![fixtures::category(1), fixtures::category(2)])),
    );
    let state = stub.app_state();

    let via_transport = fetch_names(state.categories()).await.unwrap();
    let via_raw = fetch_names(state.categories().raw()).await.unwrap();

    assert_eq!(via_transport, vec!["Category 1", "Category 2"]);
    assert_eq!(via_transport, via_raw);

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.path == CATEGORIES && r.query.is_none()));
}

#[tokio::test]
async fn test_transport_path_fails_on_not_found() {
    let stub = StubCatalog::start().await;
    let state = stub.app_state();

    let err = state.categories().get_all().await.unwrap_err();

    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "Not Found");
}

#[tokio::test]
async fn test_raw_path_ignores_error_status() {
    let stub = StubCatalog::start().await;
    stub.respond(
        CATEGORIES,
        StubResponse::json_with_status(
            StatusCode::NOT_FOUND,
            to_json(&vec![fixtures::category(3)]),
        ),
    );
    let state = stub.app_state();

    let body = state.categories().get_all_raw().await.unwrap();

    assert_eq!(body, RawCategories::List(vec![fixtures::category(3)]));
    assert!(state.categories().get_all().await.is_err());
}

#[tokio::test]
async fn test_raw_path_returns_error_object_body() {
    let error = json!({ "message": "Not Found", "statusCode": 404 });
    let stub = StubCatalog::start().await;
    stub.respond(
        CATEGORIES,
        StubResponse::json_with_status(StatusCode::NOT_FOUND, error.clone()),
    );
    let state = stub.app_state();

    let body = state.categories().get_all_raw().await.unwrap();
    let names = fetch_names(state.categories().raw()).await.unwrap();

    assert_eq!(body, RawCategories::Other(error));
    assert!(names.is_empty());
    assert_eq!(stub.request_count(CATEGORIES), 2);
}

#[tokio::test]
async fn test_raw_path_honors_request_timeout() {
    let stub = StubCatalog::start().await;
    stub.respond(CATEGORIES, StubResponse::hang());
    let config = stub.config_with(&[("NG_STORE_REQUEST_TIMEOUT_SECS", "1")]);
    let state = AppState::new(config).unwrap();

    let err = tokio::time::timeout(Duration::from_secs(10), state.categories().get_all_raw())
        .await
        .expect("raw fetch should give up after the configured timeout")
        .unwrap_err();

    assert!(matches!(err, RawFetchError::Network(_)));
}

#[tokio::test]
async fn test_raw_path_fails_on_malformed_json() {
    let stub = StubCatalog::start().await;
    stub.respond(CATEGORIES, StubResponse::raw(StatusCode::OK, "not json"));
    let state = stub.app_state();

    let err = state.categories().get_all_raw().await.unwrap_err();

    let RawFetchError::Json(message) = &err else {
        panic!("expected a JSON error, got {err:?}");
    };
    assert_eq!(err.to_string(), *message);
    assert!(!message.is_empty());
}

#[tokio::test]
async fn test_raw_path_fails_on_empty_error_body() {
    let stub = StubCatalog::start().await;
    let state = stub.app_state();

    let err = state.categories().get_all_raw().await.unwrap_err();

    assert!(matches!(err, RawFetchError::Json(_)));
}
