//! Stripe integration.
//!
//! Everything Stripe-specific lives here: verification of the `Stripe-Signature` header and the (partial) event
//! payload objects the gateway cares about. The engine crate never sees any of these types; the route handlers
//! translate them into plain identifiers and amounts before calling into the engine.

mod event_objects;
mod signature;

pub use event_objects::{
    Charge,
    EventData,
    EventEnvelope,
    LastPaymentError,
    PaymentIntent,
    PaymentMetadata,
    CHARGE_REFUNDED,
    DEFAULT_CHANNEL,
    PAYMENT_INTENT_FAILED,
    PAYMENT_INTENT_SUCCEEDED,
};
pub use signature::{
    sign_payload,
    signature_header,
    verify_webhook_signature,
    SignatureError,
    StripeSignature,
    STRIPE_SIGNATURE_HEADER,
};
