// YooKassa REST client
// Single-shot payment creation: one POST per caller request, no retries.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::errors::GatewayError;
use crate::yookassa::types::{ProviderErrorEnvelope, ProviderPaymentRequest, ProviderPaymentResponse};

pub const YOOKASSA_API_BASE: &str = "https://api.yookassa.ru";
const PAYMENTS_PATH: &str = "/v3/payments";

#[derive(Clone)]
pub struct YookassaRestClient {
    pub(crate) http: Client,
    pub(crate) api_base: String,
    pub(crate) shop_id: String,
    pub(crate) secret_key: String,
    pub(crate) idempotence_key: String,
}

impl YookassaRestClient {
    pub fn new(http: Client, shop_id: String, secret_key: String) -> Self {
        Self {
            http,
            api_base: YOOKASSA_API_BASE.to_string(),
            shop_id,
            secret_key,
            idempotence_key: String::new(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<Option<String>>) -> Self {
        if let Some(base) = base.into() {
            if !base.is_empty() {
                self.api_base = base.trim_end_matches('/').to_string();
            }
        }
        self
    }

    pub fn with_idempotence_key(mut self, key: impl Into<String>) -> Self {
        self.idempotence_key = key.into();
        self
    }

    pub fn payments_url(&self) -> String {
        format!("{}{}", self.api_base, PAYMENTS_PATH)
    }

    fn apply_common_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut req = req
            .basic_auth(&self.shop_id, Some(&self.secret_key))
            .header(CONTENT_TYPE, "application/json");
        if !self.idempotence_key.is_empty() {
            req = req.header("Idempotence-Key", &self.idempotence_key);
        }
        req
    }

    // Only a provider error object counts as a rejection; anything else is
    // left to the payment decoder.
    fn map_error(status: StatusCode, body: &str) -> Option<GatewayError> {
        let env = serde_json::from_str::<ProviderErrorEnvelope>(body).ok()?;
        if !env.is_error() {
            return None;
        }
        Some(GatewayError::ProviderRejected {
            status: status.as_u16(),
            message: env.message(),
            code: env.code,
        })
    }

    // POST /v3/payments
    #[instrument(skip(self, request), fields(method = "POST", path = "/v3/payments", description = %request.description))]
    pub async fn create_payment(
        &self,
        request: &ProviderPaymentRequest,
    ) -> Result<ProviderPaymentResponse, GatewayError> {
        let body = serde_json::to_vec(request).map_err(|e| GatewayError::EncodingError(e.to_string()))?;

        info!(
            target: "yookassa",
            method = "POST",
            path = PAYMENTS_PATH,
            amount = %request.amount.value,
            currency = %request.amount.currency,
            "yookassa request"
        );

        let req = self.apply_common_headers(self.http.post(self.payments_url())).body(body);
        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnavailable(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GatewayError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            if let Some(err) = Self::map_error(status, &text) {
                if let GatewayError::ProviderRejected { status, code, message } = &err {
                    warn!(
                        target: "yookassa",
                        http_status = *status,
                        code = code.as_deref().unwrap_or("-"),
                        error = %message,
                        "yookassa rejected payment"
                    );
                }
                return Err(err);
            }
        }

        let payment = ProviderPaymentResponse::from_json(&text).map_err(|e| {
            warn!(target: "yookassa", http_status = status.as_u16(), error = %e, "undecodable yookassa response");
            GatewayError::UpstreamMalformedResponse(format!("cannot decode provider response: {e}"))
        })?;

        let summary = payment.summary();
        info!(
            target: "yookassa",
            payment_id = %summary.id,
            status = %summary.status,
            paid = summary.paid,
            amount = %summary.amount.value,
            currency = %summary.amount.currency,
            test = summary.test,
            "yookassa payment created"
        );
        debug!(
            target: "yookassa",
            payment_id = %summary.id,
            created_at = %summary.created_at,
            refundable = summary.refundable,
            "yookassa payment details"
        );
        Ok(payment)
    }
}
