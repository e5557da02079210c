use vpg_common::Cents;

use crate::db_types::{NewPayment, Payment, PaymentConfirmation};

/// This trait defines the behaviour a backend must support to act as the store for the voucher payment gateway.
///
/// This behaviour includes:
/// * Recording pending payments on behalf of the upstream checkout flow.
/// * Applying the terminal state transitions driven by processor webhook events (completed, failed, refunded).
/// * Creating and linking vouchers for qualifying successful payments.
///
/// Every mutating operation matches records by a processor-assigned identifier and treats a zero-row match as a
/// silent no-op (`Ok(None)`), so that redeliveries referencing unknown or cleaned-up records never error.
#[allow(async_fn_in_trait)]
pub trait PaymentWebhookDatabase {
    type Error: std::error::Error;

    /// The URL of the database.
    fn url(&self) -> &str;

    /// Inserts a new payment record in `pending` status and returns its id. Called by the upstream checkout flow
    /// when a payment intent is created; the webhook handlers never insert payments.
    async fn create_pending_payment(&self, payment: NewPayment) -> Result<i64, Self::Error>;

    /// Fetches the payment record with the given payment intent id, if one exists.
    async fn fetch_payment(&self, txid: &str) -> Result<Option<Payment>, Self::Error>;

    /// Applies a successful payment event in a single atomic transaction:
    /// * marks the matching payment record as `completed` and stamps `succeeded_at`,
    /// * if the record was not already completed, carries no voucher link, and has both a week and a property
    ///   identifier, creates an `active` voucher (amount taken from the stored payment amount, not the event) and
    ///   writes the voucher id back onto the payment record.
    ///
    /// Returns `None` when no record matches the payment intent id. The voucher field of the confirmation is `None`
    /// whenever the guard above skipped voucher creation, including on event redelivery.
    async fn complete_payment(&self, txid: &str, channel: &str) -> Result<Option<PaymentConfirmation>, Self::Error>;

    /// Marks the matching payment record as `failed`, stamps `failed_at` and stores the error message in the
    /// metadata blob. Returns the updated record, or `None` if nothing matched.
    async fn fail_payment(&self, txid: &str, error_message: &str) -> Result<Option<Payment>, Self::Error>;

    /// Marks the payment record with the given charge id as `refunded` and records the refunded amount in major
    /// units. There is no status precondition: the processor's view is taken as truth, so even a failed record may
    /// be marked refunded. Returns the updated record, or `None` if nothing matched.
    async fn refund_payment(&self, charge_id: &str, amount_refunded: Cents) -> Result<Option<Payment>, Self::Error>;
}
