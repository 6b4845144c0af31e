//! Integration tests for Ng Store.
//!
//! The tests run the storefront clients against [`StubCatalog`], an `axum`
//! server on an ephemeral local port that serves canned responses per path
//! and records every request it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ng-store-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let stub = StubCatalog::start().await;
//! stub.respond("/api/v1/categories", StubResponse::json(json!([])));
//!
//! let state = stub.app_state();
//! let categories = state.categories().get_all().await?;
//!
//! assert_eq!(stub.requests().len(), 1);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use ng_store_storefront::catalog::REQUEST_ID_HEADER;
use ng_store_storefront::config::StorefrontConfig;
use ng_store_storefront::state::AppState;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Public domain given to storefronts built by [`StubCatalog::config`].
pub const TEST_DOMAIN: &str = "https://ng-store.test";

/// A request received by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub request_id: Option<String>,
}

/// Canned response for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: StatusCode,
    body: String,
    hang: bool,
}

impl StubResponse {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self::json_with_status(StatusCode::OK, body)
    }

    /// A JSON body with an arbitrary status.
    #[must_use]
    pub fn json_with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            hang: false,
        }
    }

    /// A raw body, sent as-is with a JSON content type.
    #[must_use]
    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            hang: false,
        }
    }

    /// An empty body with the given status.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self::raw(status, "")
    }

    /// Never answer.
    #[must_use]
    pub fn hang() -> Self {
        Self {
            hang: true,
            ..Self::status(StatusCode::OK)
        }
    }
}

#[derive(Default)]
struct StubState {
    routes: Mutex<HashMap<String, StubResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Stub catalog API server. Shuts down when dropped.
pub struct StubCatalog {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StubCatalog {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub catalog listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read stub catalog address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL of the stub, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `response` for every request to `path`.
    pub fn respond(&self, path: &str, response: StubResponse) {
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), response);
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received for `path`.
    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    /// Storefront configuration pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not load.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        self.config_with(&[])
    }

    /// Storefront configuration pointing at this stub, with extra variables.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not load.
    #[must_use]
    pub fn config_with(&self, extra: &[(&str, &str)]) -> StorefrontConfig {
        let api_url = self.base_url();
        StorefrontConfig::from_lookup(|key| match key {
            "NG_STORE_API_URL" => Some(api_url.clone()),
            "NG_STORE_DOMAIN" => Some(TEST_DOMAIN.to_string()),
            _ => extra
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string()),
        })
        .expect("Stub configuration should load")
    }

    /// Application state wired to this stub.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(self.config()).expect("Failed to build app state")
    }
}

impl Drop for StubCatalog {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().to_string();

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

    let response = state
        .routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&path)
        .cloned();

    let Some(response) = response else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if response.hang {
        std::future::pending::<()>().await;
    }

    (
        response.status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

/// JSON value of a serializable fixture.
///
/// # Panics
///
/// Panics if the value does not serialize.
pub fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("Fixture should serialize")
}
