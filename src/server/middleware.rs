// Per-request response decoration and fault containment

use axum::extract::Request;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tracing::error;

use crate::errors::GatewayError;

/// Every response is JSON and readable cross-origin, whatever produced it.
pub async fn apply_response_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Runs the rest of the pipeline on its own task so a panic while handling
/// one request turns into a 500 envelope for that request only.
pub async fn contain_faults(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::spawn(next.run(request)).await {
        Ok(response) => response,
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            error!(%method, %uri, panic = %message, "run time panic while handling request");
            GatewayError::InternalFault(message).into_response()
        }
        Err(e) => {
            error!(%method, %uri, error = %e, "request task did not complete");
            GatewayError::InternalFault(e.to_string()).into_response()
        }
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
