pub mod middleware;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::GatewayError;
use crate::payment_request;
use crate::settings::Config;
use crate::yookassa::types::ProviderPaymentResponse;
use crate::yookassa::{PaymentProvider, YookassaProvider};

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    pub status: &'static str,
    pub result: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(result: T) -> Self {
        Self { status: "success", result }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub status: &'static str,
    pub error: String,
}

impl FailureEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "failure",
            error: error.into(),
        }
    }
}

/// Holds the provider and the immutable settings a request needs.
pub struct PaymentGatewayService {
    pub(crate) provider: Arc<dyn PaymentProvider>,
    pub(crate) locale: String,
}

impl PaymentGatewayService {
    pub fn try_new(cfg: &Config) -> Result<Self> {
        let provider = YookassaProvider::new(&cfg.yookassa)?;
        Ok(Self::with_provider(Arc::new(provider), cfg.yookassa.locale.clone()))
    }

    pub fn with_provider(provider: Arc<dyn PaymentProvider>, locale: impl Into<String>) -> Self {
        Self {
            provider,
            locale: locale.into(),
        }
    }

    /// Received → Validated → ProviderCalled; any error short-circuits.
    pub async fn create_payment(&self, payload: &[u8]) -> Result<ProviderPaymentResponse, GatewayError> {
        let request = payment_request::translate(payload, &self.locale)?;
        debug!(
            description = %request.description,
            amount = %request.amount.value,
            currency = %request.amount.currency,
            provider = self.provider.name(),
            "payment request validated"
        );
        self.provider.create_payment(&request).await
    }
}

pub fn router(service: Arc<PaymentGatewayService>) -> Router {
    Router::new()
        .route("/create_payment", post(create_payment))
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(service)
        .layer(axum::middleware::from_fn(middleware::contain_faults))
        .layer(axum::middleware::from_fn(middleware::apply_response_headers))
}

async fn create_payment(
    State(service): State<Arc<PaymentGatewayService>>,
    body: Bytes,
) -> Response {
    match service.create_payment(&body).await {
        Ok(payment) => {
            info!(
                payment_id = %payment.id(),
                status = %payment.status(),
                has_confirmation_token = payment.confirmation_token().is_some(),
                "payment created"
            );
            (StatusCode::OK, Json(SuccessEnvelope::new(payment))).into_response()
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "create_payment failed");
            e.into_response()
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(FailureEnvelope::new("not found")))
}
