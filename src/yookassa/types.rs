// YooKassa DTOs: the outbound payment request and the payment object it answers with
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const CONFIRMATION_EMBEDDED: &str = "embedded";

/// Currencies the gateway accepts from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Gbp,
    Rub,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Rub => "RUB",
        }
    }
}

impl FromStr for Currency {
    type Err = ();

    // Exact match only; "usd" is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            "RUB" => Ok(Currency::Rub),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// YooKassa amounts travel as {"value": "19.99", "currency": "RUB"}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub value: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub locale: String,
}

/// Body of `POST /v3/payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPaymentRequest {
    pub amount: MonetaryAmount,
    pub confirmation: ConfirmationRequest,
    pub capture: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Confirmation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub confirmation_token: Option<String>,
}

/// The part of the provider's payment object the gateway checks and logs.
/// Optional fields (`description`, `metadata`, `recipient`, ...) are not
/// modelled; they only travel in the raw payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentSummary {
    pub id: String,
    pub status: String,
    pub paid: bool,
    pub amount: MonetaryAmount,
    #[serde(default)]
    pub confirmation: Option<Confirmation>,
    pub created_at: String,
    pub refundable: bool,
    pub test: bool,
}

/// Payment object returned by the provider. It must decode as a
/// [`PaymentSummary`], but serializes back exactly as received: explicit
/// `null`s, numeric amounts and unknown fields all survive the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPaymentResponse {
    summary: PaymentSummary,
    raw: Value,
}

impl ProviderPaymentResponse {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(text)?;
        let summary = PaymentSummary::deserialize(&raw)?;
        Ok(Self { summary, raw })
    }

    pub fn summary(&self) -> &PaymentSummary {
        &self.summary
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn status(&self) -> &str {
        &self.summary.status
    }

    pub fn confirmation_token(&self) -> Option<&str> {
        self.summary
            .confirmation
            .as_ref()
            .and_then(|c| c.confirmation_token.as_deref())
    }

    #[cfg(test)]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Serialize for ProviderPaymentResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

// Error object YooKassa returns with non-2xx statuses:
// { "type": "error", "id": "...", "code": "invalid_credentials", "description": "...", "parameter": "..." }
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorEnvelope {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}

impl ProviderErrorEnvelope {
    pub fn is_error(&self) -> bool {
        self.type_ == "error"
    }

    pub fn message(&self) -> String {
        match (&self.description, &self.code) {
            (Some(d), _) if !d.is_empty() => d.clone(),
            (_, Some(c)) if !c.is_empty() => format!("provider error: {c}"),
            _ => "provider error".to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_PAYMENT: &str = r#"{
    "id": "22e12f66-000f-5000-8000-18db351245c7",
    "status": "pending",
    "paid": false,
    "amount": { "value": "19.99", "currency": "USD" },
    "confirmation": {
        "type": "embedded",
        "confirmation_token": "ct-24301ae5-000f-5000-9000-13f5f1c2f8e0"
    },
    "created_at": "2018-07-18T10:51:18.139Z",
    "description": "Invoice 42",
    "metadata": {},
    "recipient": { "account_id": "100500", "gateway_id": "100700" },
    "refundable": false,
    "test": false
}"#;
