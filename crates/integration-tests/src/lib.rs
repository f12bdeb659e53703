//! Shared helpers for Smokehaus integration tests.
//!
//! Spawns an in-process mock of the order API (plus the reverse-geocode
//! endpoint) so the checkout flow can be driven end to end over real HTTP.
//! Failure modes are toggled per test through [`MockApiState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

/// Toggleable behavior and captured traffic of the mock API.
#[derive(Default)]
pub struct MockApiState {
    /// When set, `POST /orders` answers 500.
    pub fail_orders: AtomicBool,
    /// When set, `POST /orders/{id}/invoice` answers 500.
    pub fail_invoices: AtomicBool,
    /// Order payloads received, in arrival order.
    pub orders: Mutex<Vec<Value>>,
    /// Invoice requests received: (order id, body).
    pub invoices: Mutex<Vec<(String, Value)>>,
}

/// A running mock API.
pub struct MockApi {
    pub addr: SocketAddr,
    pub state: Arc<MockApiState>,
}

impl MockApi {
    /// Base URL to hand to `CheckoutConfig`.
    #[must_use]
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}", self.addr)).expect("mock addr is a valid url")
    }
}

/// Start the mock API on an ephemeral port.
///
/// # Panics
///
/// Panics if the listener cannot bind; tests cannot proceed without it.
pub async fn spawn_mock_api() -> MockApi {
    let state = Arc::new(MockApiState::default());
    let app = Router::new()
        .route("/orders", post(create_order))
        .route("/orders/{id}/invoice", post(send_invoice))
        .route("/reverse", get(reverse_geocode))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api listener");
    let addr = listener.local_addr().expect("mock api local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api serve");
    });

    MockApi { addr, state }
}

/// Initialize test logging once; repeat calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "smokehaus_checkout=debug".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn create_order(
    State(state): State<Arc<MockApiState>>,
    Json(payload): Json<Value>,
) -> axum::response::Response {
    if state.fail_orders.load(Ordering::Relaxed) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "order service unavailable").into_response();
    }

    state.orders.lock().expect("orders lock").push(payload);
    Json(json!({ "id": Uuid::new_v4().to_string() })).into_response()
}

async fn send_invoice(
    State(state): State<Arc<MockApiState>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> axum::response::Response {
    if state.fail_invoices.load(Ordering::Relaxed) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "invoice service unavailable").into_response();
    }

    state
        .invoices
        .lock()
        .expect("invoices lock")
        .push((id, payload));
    StatusCode::OK.into_response()
}

async fn reverse_geocode() -> Json<Value> {
    Json(json!({
        "display_name": "12, Road No. 1, Banjara Hills, Hyderabad, India",
        "address": { "suburb": "Banjara Hills", "city": "Hyderabad" }
    }))
}
