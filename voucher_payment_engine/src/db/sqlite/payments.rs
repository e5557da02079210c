use chrono::{DateTime, Utc};
use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewPayment, Payment},
};

const PAYMENT_COLUMNS: &str = r#"
    id,
    stripe_payment_intent_id,
    stripe_charge_id,
    user_wallet,
    week_id,
    property_id,
    amount,
    currency,
    status,
    metadata,
    refund_amount,
    voucher_id,
    succeeded_at,
    failed_at,
    created_at,
    updated_at
"#;

/// Inserts a new payment record in `pending` status. This is not atomic on its own; embed the call in a transaction
/// if you need atomicity and pass `&mut *tx` as the connection argument.
pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
            INSERT INTO fiat_payments (
                stripe_payment_intent_id,
                stripe_charge_id,
                user_wallet,
                week_id,
                property_id,
                amount,
                currency,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $8);
        "#,
    )
    .bind(payment.stripe_payment_intent_id)
    .bind(payment.stripe_charge_id)
    .bind(payment.user_wallet)
    .bind(payment.week_id)
    .bind(payment.property_id)
    .bind(payment.amount)
    .bind(payment.currency)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Returns the payment record for the given payment intent id, if one exists.
pub async fn fetch_payment_by_txid(
    txid: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, SqliteDatabaseError> {
    let query = format!("SELECT {PAYMENT_COLUMNS} FROM fiat_payments WHERE stripe_payment_intent_id = $1 LIMIT 1;");
    let payment = sqlx::query_as::<_, Payment>(&query).bind(txid).fetch_optional(conn).await?;
    Ok(payment)
}

/// Returns the payment record for the given charge id, if one exists. Charges live in a separate identifier space
/// from payment intents and are only used for refund correlation.
pub async fn fetch_payment_by_charge_id(
    charge_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, SqliteDatabaseError> {
    let query = format!("SELECT {PAYMENT_COLUMNS} FROM fiat_payments WHERE stripe_charge_id = $1 LIMIT 1;");
    let payment = sqlx::query_as::<_, Payment>(&query).bind(charge_id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn mark_completed(
    id: i64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    trace!("🗃️ Marking payment #{id} as completed");
    sqlx::query("UPDATE fiat_payments SET status = 'completed', succeeded_at = $1, updated_at = $1 WHERE id = $2;")
        .bind(timestamp)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Marks the matching payment as failed, storing the metadata JSON blob. Returns the number of affected rows so that
/// callers can distinguish a zero-row no-op from an applied update.
pub async fn mark_failed(
    txid: &str,
    metadata: &str,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            UPDATE fiat_payments SET status = 'failed', failed_at = $1, updated_at = $1, metadata = $2
            WHERE stripe_payment_intent_id = $3;
        "#,
    )
    .bind(timestamp)
    .bind(metadata)
    .bind(txid)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Marks the matching payment as refunded, recording the refunded amount in major units. Returns the number of
/// affected rows.
pub async fn mark_refunded(
    charge_id: &str,
    amount: f64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            UPDATE fiat_payments SET status = 'refunded', refund_amount = $1, updated_at = $2
            WHERE stripe_charge_id = $3;
        "#,
    )
    .bind(amount)
    .bind(timestamp)
    .bind(charge_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Writes the voucher link back onto the originating payment record, establishing the one-to-one link.
pub async fn link_voucher(
    payment_id: i64,
    voucher_id: i64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    trace!("🗃️ Linking voucher #{voucher_id} to payment #{payment_id}");
    sqlx::query("UPDATE fiat_payments SET voucher_id = $1, updated_at = $2 WHERE id = $3;")
        .bind(voucher_id)
        .bind(timestamp)
        .bind(payment_id)
        .execute(conn)
        .await?;
    Ok(())
}
