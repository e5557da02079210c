use mockall::mock;
use thiserror::Error;
use vpg_common::Cents;
use voucher_payment_engine::{
    db_types::{NewPayment, Payment, PaymentConfirmation},
    traits::PaymentWebhookDatabase,
};

#[derive(Debug, Clone, Error)]
#[error("Mock database error: {0}")]
pub struct MockDatabaseError(pub String);

mock! {
    pub PaymentGateway {}
    impl PaymentWebhookDatabase for PaymentGateway {
        type Error = MockDatabaseError;
        fn url(&self) -> &str;
        async fn create_pending_payment(&self, payment: NewPayment) -> Result<i64, MockDatabaseError>;
        async fn fetch_payment(&self, txid: &str) -> Result<Option<Payment>, MockDatabaseError>;
        async fn complete_payment(&self, txid: &str, channel: &str) -> Result<Option<PaymentConfirmation>, MockDatabaseError>;
        async fn fail_payment(&self, txid: &str, error_message: &str) -> Result<Option<Payment>, MockDatabaseError>;
        async fn refund_payment(&self, charge_id: &str, amount_refunded: Cents) -> Result<Option<Payment>, MockDatabaseError>;
    }
}
