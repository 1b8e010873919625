// Gateway error taxonomy and its mapping onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::server::FailureEnvelope;

pub const INVALID_INVOICE: &str = "invalid or missing invoice number";
pub const INVALID_AMOUNT: &str = "invalid or missing amount";
pub const INVALID_CURRENCY: &str = "invalid or missing currency, supported USD, GBP, RUB";

/// Every way a create-payment request can fail. The `Display` text is exactly
/// what the caller sees in the `error` field of the failure envelope.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    MalformedInput(String),
    #[error("{0}")]
    InvalidField(&'static str),
    #[error("{0}")]
    EncodingError(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    UpstreamMalformedResponse(String),
    /// The provider answered with its own error object.
    #[error("{message}")]
    ProviderRejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("{0}")]
    InternalFault(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MalformedInput(_) => "malformed_input",
            GatewayError::InvalidField(_) => "invalid_field",
            GatewayError::EncodingError(_) => "encoding_error",
            GatewayError::UpstreamUnavailable(_) => "upstream_unavailable",
            GatewayError::UpstreamMalformedResponse(_) => "upstream_malformed_response",
            GatewayError::ProviderRejected { .. } => "provider_rejected",
            GatewayError::InternalFault(_) => "internal_fault",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InternalFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(FailureEnvelope::new(self.to_string()))).into_response()
    }
}
