// Local HTTP fixtures: a stub YooKassa endpoint and a helper to serve routers on an ephemeral port

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct StubProvider {
    pub base_url: String,
    pub captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Answers every `POST /v3/payments` with `status` and `reply`, recording what it received.
pub async fn spawn_stub_provider(status: StatusCode, reply: impl Into<String>) -> StubProvider {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        reply: reply.into(),
        captured: Arc::clone(&captured),
    };
    let app = Router::new()
        .route("/v3/payments", post(handle_payment))
        .with_state(state);
    let addr = serve(app).await;
    StubProvider {
        base_url: format!("http://{addr}"),
        captured,
    }
}

async fn handle_payment(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.captured.lock().await.push(CapturedRequest { headers, body });
    (state.status, [(CONTENT_TYPE, "application/json")], state.reply)
}
