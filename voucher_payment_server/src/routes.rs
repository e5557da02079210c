//! Request handler definitions.
//!
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! The webhook handler is generic over the engine backend so that the endpoint tests can drive it with a mock
//! database; the server assembly instantiates it with [`SqliteDatabase`](voucher_payment_engine::SqliteDatabase).

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use serde::de::DeserializeOwned;
use voucher_payment_engine::{traits::PaymentWebhookDatabase, WebhookFlowApi};

use crate::{
    config::StripeConfig,
    data_objects::WebhookAck,
    errors::ServerError,
    integrations::stripe::{
        verify_webhook_signature,
        Charge,
        EventEnvelope,
        PaymentIntent,
        SignatureError,
        CHARGE_REFUNDED,
        PAYMENT_INTENT_FAILED,
        PAYMENT_INTENT_SUCCEEDED,
        STRIPE_SIGNATURE_HEADER,
    },
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💓️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// The webhook endpoint. The raw body bytes are needed for signature verification, so deserialization only happens
/// after the gate has passed.
pub async fn stripe_webhook<B: PaymentWebhookDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<WebhookFlowApi<B>>,
    stripe: web::Data<StripeConfig>,
) -> Result<HttpResponse, ServerError> {
    trace!("💳️ Received webhook request: {}", req.uri());
    let header = req
        .headers()
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader)?;
    verify_webhook_signature(
        stripe.webhook_secret.reveal(),
        header,
        &body,
        stripe.signature_tolerance.num_seconds(),
    )
    .map_err(|e| {
        warn!("🔐️ Webhook signature verification failed. {e}");
        e
    })?;
    trace!("🔐️ Webhook signature check ✅️");
    let event = serde_json::from_slice::<EventEnvelope>(&body).map_err(|e| {
        warn!("💳️ Could not parse webhook payload. {e}");
        ServerError::CouldNotDeserializePayload(e.to_string())
    })?;
    dispatch_event(event, api.get_ref()).await?;
    Ok(HttpResponse::Ok().json(WebhookAck::acknowledged()))
}

/// Routes a verified event to its handler. Event types the gateway does not care about are acknowledged without any
/// handler being invoked, otherwise the processor would retry them indefinitely.
async fn dispatch_event<B>(event: EventEnvelope, api: &WebhookFlowApi<B>) -> Result<(), ServerError>
where B: PaymentWebhookDatabase {
    match event.event_type.as_str() {
        PAYMENT_INTENT_SUCCEEDED => {
            let intent: PaymentIntent = parse_event_object(event.data.object)?;
            let channel = intent.metadata.channel().to_string();
            info!(
                "💳️ Payment succeeded: {} | {channel} | {} {}",
                intent.id,
                intent.amount.to_major(),
                intent.currency
            );
            if let Some(reference) = &intent.metadata.reference {
                debug!("💳️ Payment [{}] carries reference {reference}", intent.id);
            }
            api.on_payment_succeeded(&intent.id, &channel).await?;
        },
        PAYMENT_INTENT_FAILED => {
            let intent: PaymentIntent = parse_event_object(event.data.object)?;
            warn!("💳️ Payment failed: {} | {}", intent.id, intent.error_message());
            api.on_payment_failed(&intent.id, intent.error_message()).await?;
        },
        CHARGE_REFUNDED => {
            let charge: Charge = parse_event_object(event.data.object)?;
            info!("💳️ Refund processed: {} | {}", charge.id, charge.amount_refunded);
            api.on_charge_refunded(&charge.id, charge.amount_refunded).await?;
        },
        other => {
            debug!("💳️ Ignoring unhandled webhook event type: {other} ({:?})", event.id);
        },
    }
    Ok(())
}

fn parse_event_object<T: DeserializeOwned>(object: serde_json::Value) -> Result<T, ServerError> {
    serde_json::from_value(object).map_err(|e| {
        warn!("💳️ Could not parse event object. {e}");
        ServerError::CouldNotDeserializePayload(e.to_string())
    })
}
