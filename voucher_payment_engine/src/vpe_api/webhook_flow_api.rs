use std::fmt::Debug;

use log::*;
use vpg_common::Cents;

use crate::{
    db_types::{Payment, PaymentConfirmation},
    traits::PaymentWebhookDatabase,
    vpe_api::errors::WebhookFlowError,
};

/// `WebhookFlowApi` is the primary API for applying processor webhook events to the payment store. Each method maps
/// one event type onto its database mutation and logs the outcome; the route handlers in the server crate should not
/// talk to the backend directly.
pub struct WebhookFlowApi<B> {
    db: B,
}

impl<B> Debug for WebhookFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookFlowApi")
    }
}

impl<B> WebhookFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> WebhookFlowApi<B>
where B: PaymentWebhookDatabase
{
    /// Handles a `payment_intent.succeeded` event.
    ///
    /// The matching payment record is marked as completed, and a voucher is created and linked when the record
    /// carries both a week and a property identifier and has not been confirmed before. A payment intent id that
    /// matches no record is ignored, since the processor may redeliver events for records that no longer exist.
    pub async fn on_payment_succeeded(
        &self,
        txid: &str,
        channel: &str,
    ) -> Result<Option<PaymentConfirmation>, WebhookFlowError> {
        let result = self
            .db
            .complete_payment(txid, channel)
            .await
            .map_err(|e| WebhookFlowError::DatabaseError(e.to_string()))?;
        match &result {
            Some(confirmation) => {
                info!("💳️ Payment [{txid}] marked as completed.");
                match &confirmation.voucher {
                    Some(voucher) => info!("🎫️ Voucher {} created for payment [{txid}].", voucher.voucher_code),
                    None => debug!("🎫️ No voucher issued for payment [{txid}]."),
                }
            },
            None => debug!("💳️ No payment record matches [{txid}]. Ignoring."),
        }
        Ok(result)
    }

    /// Handles a `payment_intent.payment_failed` event. The error message ends up in the record's metadata blob.
    pub async fn on_payment_failed(
        &self,
        txid: &str,
        error_message: &str,
    ) -> Result<Option<Payment>, WebhookFlowError> {
        let result = self
            .db
            .fail_payment(txid, error_message)
            .await
            .map_err(|e| WebhookFlowError::DatabaseError(e.to_string()))?;
        match &result {
            Some(_) => info!("💳️ Payment [{txid}] marked as failed. {error_message}"),
            None => debug!("💳️ No payment record matches [{txid}]. Ignoring."),
        }
        Ok(result)
    }

    /// Handles a `charge.refunded` event. Matching is done on the charge id, not the payment intent id.
    pub async fn on_charge_refunded(
        &self,
        charge_id: &str,
        amount_refunded: Cents,
    ) -> Result<Option<Payment>, WebhookFlowError> {
        let result = self
            .db
            .refund_payment(charge_id, amount_refunded)
            .await
            .map_err(|e| WebhookFlowError::DatabaseError(e.to_string()))?;
        match &result {
            Some(payment) => info!("💳️ Payment [{}] marked as refunded ({amount_refunded}).", payment.stripe_payment_intent_id),
            None => debug!("💳️ No payment record matches charge [{charge_id}]. Ignoring."),
        }
        Ok(result)
    }
}
