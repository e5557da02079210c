use std::fmt::Debug;

use chrono::Utc;
use log::debug;
use sqlx::SqlitePool;
use vpg_common::Cents;

use crate::{
    db::{
        sqlite::{new_pool, payments, vouchers, SqliteDatabaseError},
        traits::PaymentWebhookDatabase,
    },
    db_types::{NewPayment, NewVoucher, Payment, PaymentConfirmation, PaymentStatus},
    helpers::voucher_code,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new pool against the given URL and brings the schema up to date with the embedded migrations.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }
}

impl PaymentWebhookDatabase for SqliteDatabase {
    type Error = SqliteDatabaseError;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_pending_payment(&self, payment: NewPayment) -> Result<i64, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let txid = payment.stripe_payment_intent_id.clone();
        let id = payments::insert_payment(payment, &mut conn).await?;
        debug!("🗃️ Payment [{txid}] has been saved in the DB with id {id}");
        Ok(id)
    }

    async fn fetch_payment(&self, txid: &str) -> Result<Option<Payment>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment_by_txid(txid, &mut conn).await
    }

    /// Applies a successful payment event in a single atomic transaction:
    /// * fetches the payment record for the payment intent id. If none matches, nothing is done.
    /// * marks the record as `completed` and stamps `succeeded_at`.
    /// * if the record was still pending a voucher (not already completed, no voucher link) and carries both a week
    ///   and a property id, inserts an `active` voucher and writes its id back onto the payment record.
    ///
    /// The transaction means a fault in any step leaves no partial state behind, and the status/link guard means a
    /// redelivered success event can never create a second voucher.
    async fn complete_payment(&self, txid: &str, channel: &str) -> Result<Option<PaymentConfirmation>, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let Some(mut payment) = payments::fetch_payment_by_txid(txid, &mut tx).await? else {
            return Ok(None);
        };
        let already_completed = payment.status == PaymentStatus::Completed;
        let now = Utc::now();
        payments::mark_completed(payment.id, now, &mut tx).await?;
        let voucher = match (&payment.week_id, &payment.property_id) {
            (Some(week_id), Some(property_id)) if !already_completed && payment.voucher_id.is_none() => {
                let new_voucher = NewVoucher {
                    user_id: payment.user_wallet.clone(),
                    week_id: week_id.clone(),
                    property_id: property_id.clone(),
                    voucher_code: voucher_code(channel, txid),
                    // The voucher records what was actually charged upstream, not the event amount.
                    amount_paid: payment.amount,
                    payment_method: format!("stripe_{channel}"),
                };
                let voucher = vouchers::insert_voucher(new_voucher, now, &mut tx).await?;
                payments::link_voucher(payment.id, voucher.id, now, &mut tx).await?;
                Some(voucher)
            },
            _ => None,
        };
        tx.commit().await?;
        payment.status = PaymentStatus::Completed;
        payment.succeeded_at = Some(now);
        payment.updated_at = now;
        if let Some(v) = &voucher {
            payment.voucher_id = Some(v.id);
        }
        Ok(Some(PaymentConfirmation { payment, voucher }))
    }

    async fn fail_payment(&self, txid: &str, error_message: &str) -> Result<Option<Payment>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let metadata = serde_json::json!({ "error_message": error_message }).to_string();
        let affected = payments::mark_failed(txid, &metadata, Utc::now(), &mut conn).await?;
        if affected == 0 {
            return Ok(None);
        }
        payments::fetch_payment_by_txid(txid, &mut conn).await
    }

    async fn refund_payment(&self, charge_id: &str, amount_refunded: Cents) -> Result<Option<Payment>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let affected = payments::mark_refunded(charge_id, amount_refunded.to_major(), Utc::now(), &mut conn).await?;
        if affected == 0 {
            return Ok(None);
        }
        payments::fetch_payment_by_charge_id(charge_id, &mut conn).await
    }
}
