// YooKassa provider module

pub mod rest;
pub mod types;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::GatewayError;
use crate::settings::YookassaSettings;
use self::rest::YookassaRestClient;
use self::types::{ProviderPaymentRequest, ProviderPaymentResponse};

/// Seam between the HTTP handler and whatever actually creates the payment.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_payment(
        &self,
        request: &ProviderPaymentRequest,
    ) -> Result<ProviderPaymentResponse, GatewayError>;
}

#[derive(Clone)]
pub struct YookassaProvider {
    pub(crate) rest: YookassaRestClient,
}

impl YookassaProvider {
    // rustls-backed client with reqwest's default timeouts.
    pub fn new(cfg: &YookassaSettings) -> Result<Self, reqwest::Error> {
        let http = Client::builder().use_rustls_tls().build()?;

        let rest = YookassaRestClient::new(http, cfg.shop_id.clone(), cfg.secret_key.clone())
            .with_api_base(if cfg.api_base.is_empty() { None } else { Some(cfg.api_base.clone()) })
            .with_idempotence_key(cfg.idempotence_key.clone());

        Ok(Self { rest })
    }

    #[allow(dead_code)]
    pub fn rest(&self) -> &YookassaRestClient {
        &self.rest
    }
}

#[async_trait]
impl PaymentProvider for YookassaProvider {
    fn name(&self) -> &'static str {
        "yookassa"
    }

    async fn create_payment(
        &self,
        request: &ProviderPaymentRequest,
    ) -> Result<ProviderPaymentResponse, GatewayError> {
        self.rest.create_payment(request).await
    }
}
