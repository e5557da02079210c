use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewVoucher, Voucher, VoucherStatus},
};

/// Inserts a new voucher in `active` status and returns the stored record. This is not atomic on its own; the
/// success flow embeds this call in the same transaction that updates the payment record.
pub async fn insert_voucher(
    voucher: NewVoucher,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Voucher, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO vouchers (
                user_id,
                week_id,
                property_id,
                voucher_code,
                amount_paid,
                payment_method,
                status,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, 'active', $7);
        "#,
    )
    .bind(&voucher.user_id)
    .bind(&voucher.week_id)
    .bind(&voucher.property_id)
    .bind(&voucher.voucher_code)
    .bind(voucher.amount_paid)
    .bind(&voucher.payment_method)
    .bind(timestamp)
    .execute(conn)
    .await?;
    let id = result.last_insert_rowid();
    debug!("🗃️ Voucher {} has been saved in the DB with id {id}", voucher.voucher_code);
    Ok(Voucher {
        id,
        user_id: voucher.user_id,
        week_id: voucher.week_id,
        property_id: voucher.property_id,
        voucher_code: voucher.voucher_code,
        amount_paid: voucher.amount_paid,
        payment_method: voucher.payment_method,
        status: VoucherStatus::Active,
        created_at: timestamp,
    })
}
