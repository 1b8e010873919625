// Inbound create-payment request: decoding, validation and translation to the provider shape

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{GatewayError, INVALID_AMOUNT, INVALID_CURRENCY, INVALID_INVOICE};
use crate::yookassa::types::{
    ConfirmationRequest, Currency, MonetaryAmount, ProviderPaymentRequest, CONFIRMATION_EMBEDDED,
};

/// Body of `POST /create_payment`.
///
/// Absent fields take their zero value so that a missing invoice, amount or
/// currency is reported the same way as an invalid one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentCreateRequest {
    #[serde(default)]
    pub invoice: i64,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
}

impl PaymentCreateRequest {
    /// Decode from the raw request body
    pub fn decode(payload: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(payload).map_err(|e| GatewayError::MalformedInput(e.to_string()))
    }

    /// Check invoice, amount and currency in that order; the first violation wins.
    pub fn validate(&self) -> Result<Currency, GatewayError> {
        if self.invoice <= 0 {
            return Err(GatewayError::InvalidField(INVALID_INVOICE));
        }
        if self.amount <= Decimal::ZERO {
            return Err(GatewayError::InvalidField(INVALID_AMOUNT));
        }
        self.currency
            .parse::<Currency>()
            .map_err(|_| GatewayError::InvalidField(INVALID_CURRENCY))
    }

    pub fn description(&self) -> String {
        format!("Invoice {}", self.invoice)
    }

    pub fn into_provider_request(self, locale: &str) -> Result<ProviderPaymentRequest, GatewayError> {
        let currency = self.validate()?;
        Ok(ProviderPaymentRequest {
            description: self.description(),
            amount: MonetaryAmount {
                value: self.amount,
                currency: currency.to_string(),
            },
            confirmation: ConfirmationRequest {
                kind: CONFIRMATION_EMBEDDED.to_string(),
                locale: locale.to_string(),
            },
            capture: true,
        })
    }
}

/// Raw body + configured locale → provider request.
pub fn translate(payload: &[u8], locale: &str) -> Result<ProviderPaymentRequest, GatewayError> {
    PaymentCreateRequest::decode(payload)?.into_provider_request(locale)
}
