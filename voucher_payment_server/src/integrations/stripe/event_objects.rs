use serde::Deserialize;
use vpg_common::Cents;

pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";
pub const CHARGE_REFUNDED: &str = "charge.refunded";

/// The channel recorded when the checkout flow did not attach one to the payment intent.
pub const DEFAULT_CHANNEL: &str = "card";

/// The outer shell common to every Stripe event. The inner object is kept as raw JSON until the event type has been
/// inspected, since its shape depends on the type.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The slice of a `payment_intent` object that the gateway reads. Stripe sends far more fields; unknown ones are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Amount in minor units. Only used for logging; the stored payment amount is authoritative.
    #[serde(default)]
    pub amount: Cents,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub metadata: PaymentMetadata,
    #[serde(default)]
    pub last_payment_error: Option<LastPaymentError>,
}

impl PaymentIntent {
    /// The error text for a failed payment, falling back to the processor-agnostic default when Stripe did not
    /// include one.
    pub fn error_message(&self) -> &str {
        self.last_payment_error.as_ref().and_then(|e| e.message.as_deref()).unwrap_or("Unknown error")
    }
}

/// The metadata bag the checkout flow attaches when creating a payment intent. All keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

impl PaymentMetadata {
    pub fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or(DEFAULT_CHANNEL)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastPaymentError {
    #[serde(default)]
    pub message: Option<String>,
}

/// The slice of a `charge` object needed to apply a refund.
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub amount_refunded: Cents,
}
